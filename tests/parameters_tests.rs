#![allow(clippy::unwrap_used, clippy::expect_used)]

use edmbuilder::model::{EdmTypeKind, ModelBuilder, TypeRef};
use edmbuilder::{BindingParameter, ModelError, NonbindingParameter, ParameterConfiguration};

fn contoso() -> ModelBuilder {
    let mut builder = ModelBuilder::with_namespace("Contoso.Models");
    builder
        .entity_type("Customer")
        .expect("register Customer")
        .property("Id", ty("int"))
        .has_key("Id");
    builder.complex_type("Address").expect("register Address");
    builder
        .enum_type("Color", ["Red", "Green", "Blue"])
        .expect("register Color");
    builder
}

fn ty(declared: &str) -> TypeRef {
    declared.parse().expect("valid type reference")
}

fn nonbinding(builder: &ModelBuilder, declared: &str) -> NonbindingParameter {
    builder
        .nonbinding_parameter("p", &ty(declared))
        .expect("non-binding parameter")
}

#[test]
fn test_binding_parameter_rejects_complex_type() {
    let builder = contoso();
    let address = builder
        .get_type_configuration_or_none(&ty("Address"))
        .expect("Address resolves");

    let err = BindingParameter::new("p", address).unwrap_err();
    match &err {
        ModelError::InvalidArgument { param_name, message } => {
            assert_eq!(*param_name, "parameterType");
            assert!(message.contains("'Contoso.Models.Address'"), "message: {message}");
        }
        other => panic!("expected InvalidArgument, got {other:?}"),
    }
}

#[test]
fn test_binding_parameter_accepts_entities() {
    let builder = contoso();
    for declared in ["Customer", "IEnumerable<Customer>", "IList<Customer>", "Customer[]"] {
        let binding = builder
            .binding_parameter("bound", &ty(declared))
            .unwrap_or_else(|e| panic!("{declared}: {e}"));
        assert_eq!(
            binding.parameter_type().element_or_self_kind(),
            EdmTypeKind::Entity
        );
        assert!(binding.optional_parameter());
    }
}

#[test]
fn test_binding_parameter_rejects_non_entities() {
    let builder = contoso();
    for declared in ["int", "string", "Color", "Color?", "IList<Address>", "IEnumerable<int>"] {
        let err = builder.binding_parameter("bound", &ty(declared)).unwrap_err();
        assert_eq!(err.param_name(), Some("parameterType"), "{declared}");
    }
}

#[test]
fn test_binding_parameter_with_unregistered_type() {
    let builder = contoso();
    let err = builder.binding_parameter("order", &ty("Order")).unwrap_err();
    assert_eq!(err.param_name(), Some("parameterType"));
    assert!(err.to_string().contains("'Contoso.Models.Order'"));
}

#[test]
fn test_nonbinding_optional_for_scalar_types() {
    let builder = contoso();
    let cases = [
        ("int", false),
        ("double?", true),
        ("string", true),
        ("byte[]", true),
        ("Guid", false),
        ("Nullable<Guid>", true),
        ("Color", false),
        ("Color?", true),
        ("Address", true),
        ("Customer", true),
    ];
    for (declared, expected) in cases {
        assert_eq!(
            nonbinding(&builder, declared).optional_parameter(),
            expected,
            "{declared}"
        );
    }
}

#[test]
fn test_nonbinding_optional_for_collections_follows_element() {
    let builder = contoso();
    let cases = [
        ("IEnumerable<int>", false),
        ("IEnumerable<int?>", true),
        ("ICollection<Color>", false),
        ("IEnumerable<Color?>", true),
        ("IList<Address>", true),
        ("IList<Customer>", true),
        ("string[]", true),
        ("Collection(Edm.Int32)", false),
    ];
    for (declared, expected) in cases {
        let parameter = nonbinding(&builder, declared);
        assert_eq!(
            parameter.parameter_type().map(|t| t.kind()),
            Some(EdmTypeKind::Collection),
            "{declared}"
        );
        assert_eq!(parameter.optional_parameter(), expected, "{declared}");
    }
}

#[test]
fn test_nonbinding_unresolved_type_is_not_optional() {
    let builder = contoso();
    for declared in ["Order", "IList<Order>", "int??", "IEnumerable<int>?"] {
        let parameter = nonbinding(&builder, declared);
        assert!(parameter.type_configuration().is_none(), "{declared}");
        assert!(!parameter.optional_parameter(), "{declared}");
    }
    let absent = NonbindingParameter::new("p", None).unwrap();
    assert!(!absent.optional_parameter());
}

#[test]
fn test_optional_is_fixed_at_construction() {
    let mut builder = contoso();
    let parameter = nonbinding(&builder, "Color");
    builder.enum_type("Color", ["Black"]).unwrap();
    assert!(!parameter.optional_parameter());
    assert!(!nonbinding(&builder, "Color").optional_parameter());
}
