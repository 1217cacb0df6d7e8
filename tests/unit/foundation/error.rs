use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CarouselError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        CarouselError::decode("x")
            .to_string()
            .contains("decode error:")
    );
    assert!(
        CarouselError::export("x")
            .to_string()
            .contains("export error:")
    );
    assert!(
        CarouselError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn capacity_and_expiry_carry_their_numbers() {
    assert!(CarouselError::capacity(15).to_string().contains("15 slides"));
    assert!(CarouselError::expired(1234).to_string().contains("1234"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CarouselError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn serde_json_errors_map_to_serde_variant() {
    let err: CarouselError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, CarouselError::Serde(_)));
}
