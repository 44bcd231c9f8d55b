use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Namespace used for EDM primitive type names (`Edm.Int32`, `Edm.String`, ...).
pub const EDM_NAMESPACE: &str = "Edm";

/// The kind of a metadata type as seen by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdmTypeKind {
    Primitive,
    Enum,
    Entity,
    Complex,
    Collection,
}

impl fmt::Display for EdmTypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EdmTypeKind::Primitive => "Primitive",
            EdmTypeKind::Enum => "Enum",
            EdmTypeKind::Entity => "Entity",
            EdmTypeKind::Complex => "Complex",
            EdmTypeKind::Collection => "Collection",
        };
        write!(f, "{s}")
    }
}

/// Primitive scalar kinds understood by the model builder.
///
/// Most primitives are value types and only become nullable when wrapped
/// (`int?`). `String`, `Binary` and `Stream` are reference-like and are
/// always nullable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    SByte,
    Int16,
    Int32,
    Int64,
    Single,
    Double,
    Decimal,
    String,
    Guid,
    Date,
    DateTimeOffset,
    Duration,
    TimeOfDay,
    Binary,
    Stream,
}

impl PrimitiveKind {
    /// Name of the primitive inside the `Edm` namespace.
    #[must_use]
    pub const fn edm_name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "Boolean",
            PrimitiveKind::Byte => "Byte",
            PrimitiveKind::SByte => "SByte",
            PrimitiveKind::Int16 => "Int16",
            PrimitiveKind::Int32 => "Int32",
            PrimitiveKind::Int64 => "Int64",
            PrimitiveKind::Single => "Single",
            PrimitiveKind::Double => "Double",
            PrimitiveKind::Decimal => "Decimal",
            PrimitiveKind::String => "String",
            PrimitiveKind::Guid => "Guid",
            PrimitiveKind::Date => "Date",
            PrimitiveKind::DateTimeOffset => "DateTimeOffset",
            PrimitiveKind::Duration => "Duration",
            PrimitiveKind::TimeOfDay => "TimeOfDay",
            PrimitiveKind::Binary => "Binary",
            PrimitiveKind::Stream => "Stream",
        }
    }

    /// Short keyword used when a declared type is written out.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "bool",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::SByte => "sbyte",
            PrimitiveKind::Int16 => "short",
            PrimitiveKind::Int32 => "int",
            PrimitiveKind::Int64 => "long",
            PrimitiveKind::Single => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Decimal => "decimal",
            PrimitiveKind::String => "string",
            PrimitiveKind::Guid => "Guid",
            PrimitiveKind::Date => "Date",
            PrimitiveKind::DateTimeOffset => "DateTimeOffset",
            PrimitiveKind::Duration => "TimeSpan",
            PrimitiveKind::TimeOfDay => "TimeOfDay",
            PrimitiveKind::Binary => "byte[]",
            PrimitiveKind::Stream => "Stream",
        }
    }

    /// Full name, e.g. `Edm.Int32`.
    #[must_use]
    pub fn full_name(self) -> String {
        format!("{EDM_NAMESPACE}.{}", self.edm_name())
    }

    /// Reference-like primitives carry no value-type semantics and accept null.
    #[must_use]
    pub const fn is_reference_like(self) -> bool {
        matches!(
            self,
            PrimitiveKind::String | PrimitiveKind::Binary | PrimitiveKind::Stream
        )
    }

    /// Resolve a keyword, a bare EDM name or an `Edm.`-qualified name.
    pub fn from_alias(alias: &str) -> Option<Self> {
        let kind = match alias.strip_prefix("Edm.").unwrap_or(alias) {
            "bool" | "Boolean" => PrimitiveKind::Boolean,
            "byte" | "Byte" => PrimitiveKind::Byte,
            "sbyte" | "SByte" => PrimitiveKind::SByte,
            "short" | "Int16" => PrimitiveKind::Int16,
            "int" | "Int32" => PrimitiveKind::Int32,
            "long" | "Int64" => PrimitiveKind::Int64,
            "float" | "Single" => PrimitiveKind::Single,
            "double" | "Double" => PrimitiveKind::Double,
            "decimal" | "Decimal" => PrimitiveKind::Decimal,
            "string" | "String" => PrimitiveKind::String,
            "Guid" => PrimitiveKind::Guid,
            "Date" => PrimitiveKind::Date,
            "DateTimeOffset" => PrimitiveKind::DateTimeOffset,
            "TimeSpan" | "Duration" => PrimitiveKind::Duration,
            "TimeOfDay" => PrimitiveKind::TimeOfDay,
            "byte[]" | "Binary" => PrimitiveKind::Binary,
            "Stream" => PrimitiveKind::Stream,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.edm_name())
    }
}

/// Container shapes recognised as collections.
///
/// This is a closed set; any other generic wrapper is rejected when a type
/// reference is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionShape {
    /// `IEnumerable<T>` or EDM `Collection(T)`
    Sequence,
    /// `ICollection<T>`
    Collection,
    /// `IList<T>` / `List<T>`
    List,
    /// `ISet<T>` / `HashSet<T>`
    Set,
    /// `T[]`
    Array,
}

impl CollectionShape {
    /// Map a generic container name to its shape.
    pub fn from_generic(name: &str) -> Option<Self> {
        match name {
            "IEnumerable" => Some(CollectionShape::Sequence),
            "ICollection" => Some(CollectionShape::Collection),
            "IList" | "List" => Some(CollectionShape::List),
            "ISet" | "HashSet" => Some(CollectionShape::Set),
            _ => None,
        }
    }
}

/// A qualified type name: `Namespace.Name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeName {
    pub namespace: String,
    pub name: String,
}

impl TypeName {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        TypeName {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Split a possibly qualified name on its last `.`; unqualified names
    /// land in `default_namespace`.
    pub fn parse(qualified: &str, default_namespace: &str) -> Self {
        match qualified.rsplit_once('.') {
            Some((namespace, name)) => TypeName::new(namespace, name),
            None => TypeName::new(default_namespace, qualified),
        }
    }

    #[must_use]
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

/// A declared, language-level type as written on an operation parameter.
///
/// `TypeRef` carries no registry knowledge: whether `Named("Color")` is an
/// enum or an entity is only known once the model resolves it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Primitive(PrimitiveKind),
    Named(String),
    Nullable(Box<TypeRef>),
    Collection(CollectionShape, Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    #[must_use]
    pub fn nullable(self) -> Self {
        TypeRef::Nullable(Box::new(self))
    }

    #[must_use]
    pub fn collection_of(shape: CollectionShape, element: TypeRef) -> Self {
        TypeRef::Collection(shape, Box::new(element))
    }

    /// Strip one nullable wrapper, if present.
    #[must_use]
    pub fn underlying_type_or_self(&self) -> &TypeRef {
        match self {
            TypeRef::Nullable(inner) => inner,
            other => other,
        }
    }

    /// Returns the container shape and element type when this is a collection.
    #[must_use]
    pub fn as_collection(&self) -> Option<(CollectionShape, &TypeRef)> {
        match self {
            TypeRef::Collection(shape, element) => Some((*shape, element)),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_collection(&self) -> bool {
        self.as_collection().is_some()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(kind) => write!(f, "{}", kind.keyword()),
            TypeRef::Named(name) => write!(f, "{name}"),
            TypeRef::Nullable(inner) => write!(f, "{inner}?"),
            TypeRef::Collection(shape, element) => match shape {
                CollectionShape::Sequence => write!(f, "IEnumerable<{element}>"),
                CollectionShape::Collection => write!(f, "ICollection<{element}>"),
                CollectionShape::List => write!(f, "IList<{element}>"),
                CollectionShape::Set => write!(f, "ISet<{element}>"),
                CollectionShape::Array => write!(f, "{element}[]"),
            },
        }
    }
}

impl FromStr for TypeRef {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_type_ref(s, s, 0)
    }
}

/// Wrappers (`?`, `[]`, `Nullable<..>`, generics) nested deeper than this are
/// rejected. Anything past two levels never resolves.
pub const MAX_TYPE_NESTING: usize = 8;

fn parse_type_ref(input: &str, original: &str, depth: usize) -> Result<TypeRef, ModelError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(ModelError::invalid_type_reference(original, "empty type"));
    }
    if depth > MAX_TYPE_NESTING {
        return Err(ModelError::invalid_type_reference(
            original,
            format!("type wrappers nested deeper than {MAX_TYPE_NESTING} levels"),
        ));
    }

    // byte[] is the binary primitive, not an array of bytes
    if let Some(kind) = PrimitiveKind::from_alias(s) {
        return Ok(TypeRef::Primitive(kind));
    }

    if let Some(inner) = s.strip_suffix('?') {
        return Ok(parse_type_ref(inner, original, depth + 1)?.nullable());
    }

    if let Some(inner) = s.strip_suffix("[]") {
        let element = parse_type_ref(inner, original, depth + 1)?;
        return Ok(TypeRef::collection_of(CollectionShape::Array, element));
    }

    if let Some(inner) = s.strip_prefix("Collection(").and_then(|r| r.strip_suffix(')')) {
        let element = parse_type_ref(inner, original, depth + 1)?;
        return Ok(TypeRef::collection_of(CollectionShape::Sequence, element));
    }

    if let Some((head, rest)) = s.split_once('<') {
        let inner = rest.strip_suffix('>').ok_or_else(|| {
            ModelError::invalid_type_reference(original, "unbalanced generic brackets")
        })?;
        let head = head.trim();
        if head == "Nullable" {
            return Ok(parse_type_ref(inner, original, depth + 1)?.nullable());
        }
        let shape = CollectionShape::from_generic(head).ok_or_else(|| {
            ModelError::invalid_type_reference(
                original,
                format!("'{head}' is not a recognised collection type"),
            )
        })?;
        let element = parse_type_ref(inner, original, depth + 1)?;
        return Ok(TypeRef::collection_of(shape, element));
    }

    if !is_qualified_identifier(s) {
        return Err(ModelError::invalid_type_reference(
            original,
            format!("'{s}' is not a valid type name"),
        ));
    }

    Ok(TypeRef::Named(s.to_string()))
}

pub(crate) fn is_qualified_identifier(s: &str) -> bool {
    s.split('.').all(|segment| {
        let mut chars = segment.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() || first == '_' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            _ => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> TypeRef {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_primitive_aliases() {
        assert_eq!(parse("int"), TypeRef::Primitive(PrimitiveKind::Int32));
        assert_eq!(parse("Edm.Int32"), TypeRef::Primitive(PrimitiveKind::Int32));
        assert_eq!(parse("Int64"), TypeRef::Primitive(PrimitiveKind::Int64));
        assert_eq!(parse("byte[]"), TypeRef::Primitive(PrimitiveKind::Binary));
        assert_eq!(parse(" string "), TypeRef::Primitive(PrimitiveKind::String));
    }

    #[test]
    fn test_parse_nullable_forms() {
        let expected = TypeRef::Primitive(PrimitiveKind::Double).nullable();
        assert_eq!(parse("double?"), expected);
        assert_eq!(parse("Nullable<double>"), expected);
        assert_eq!(parse("Color?"), TypeRef::named("Color").nullable());
    }

    #[test]
    fn test_parse_collection_shapes() {
        assert_eq!(
            parse("IEnumerable<int?>"),
            TypeRef::collection_of(
                CollectionShape::Sequence,
                TypeRef::Primitive(PrimitiveKind::Int32).nullable()
            )
        );
        assert_eq!(
            parse("ICollection<Color>"),
            TypeRef::collection_of(CollectionShape::Collection, TypeRef::named("Color"))
        );
        assert_eq!(
            parse("List<Contoso.Models.Address>"),
            TypeRef::collection_of(
                CollectionShape::List,
                TypeRef::named("Contoso.Models.Address")
            )
        );
        assert_eq!(
            parse("HashSet<Guid>"),
            TypeRef::collection_of(
                CollectionShape::Set,
                TypeRef::Primitive(PrimitiveKind::Guid)
            )
        );
        assert_eq!(
            parse("Customer[]"),
            TypeRef::collection_of(CollectionShape::Array, TypeRef::named("Customer"))
        );
        assert_eq!(
            parse("Collection(Edm.String)"),
            TypeRef::collection_of(
                CollectionShape::Sequence,
                TypeRef::Primitive(PrimitiveKind::String)
            )
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<TypeRef>().is_err());
        assert!("Dictionary<int>".parse::<TypeRef>().is_err());
        assert!("IEnumerable<int".parse::<TypeRef>().is_err());
        assert!("9Lives".parse::<TypeRef>().is_err());
        assert!("Foo..Bar".parse::<TypeRef>().is_err());
    }

    #[test]
    fn test_display_round_trips_source_form() {
        for src in ["int", "double?", "IEnumerable<Color?>", "IList<Address>", "Customer[]"] {
            assert_eq!(parse(src).to_string(), src);
        }
    }

    #[test]
    fn test_underlying_type_and_collection_helpers() {
        let t = parse("Color?");
        assert_eq!(t.underlying_type_or_self(), &TypeRef::named("Color"));
        assert!(!t.is_collection());

        let c = parse("IList<int>");
        let (shape, element) = c.as_collection().unwrap();
        assert_eq!(shape, CollectionShape::List);
        assert_eq!(element, &TypeRef::Primitive(PrimitiveKind::Int32));
    }

    #[test]
    fn test_nesting_depth_is_capped() {
        let deep = format!("int{}", "?".repeat(200_000));
        let err = deep.parse::<TypeRef>().unwrap_err();
        assert!(matches!(err, ModelError::InvalidTypeReference { .. }));

        let nested = format!("{}int{}", "IList<".repeat(50), ">".repeat(50));
        assert!(nested.parse::<TypeRef>().is_err());

        let at_limit = format!("int{}", "[]".repeat(MAX_TYPE_NESTING));
        assert!(at_limit.parse::<TypeRef>().is_ok());
    }

    #[test]
    fn test_type_name_parse() {
        let n = TypeName::parse("Contoso.Models.Customer", "Default");
        assert_eq!(n.namespace, "Contoso.Models");
        assert_eq!(n.name, "Customer");
        assert_eq!(TypeName::parse("Customer", "Default").full_name(), "Default.Customer");
    }
}
