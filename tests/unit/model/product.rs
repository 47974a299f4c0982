use storefront::model::GarmentTypeModel;

fn ut_garment(name: &str) -> GarmentTypeModel {
    GarmentTypeModel {
        id_: 7,
        name: name.to_string(),
    }
}

#[test]
fn label_strips_diacritics() {
    let result = ut_garment("Remera Niño").conversation_label();
    assert_eq!(result.unwrap().as_str(), "remeranino");
    let result = ut_garment("Camisón São Paulo").conversation_label();
    assert_eq!(result.unwrap().as_str(), "camisonsaopaulo");
}

#[test]
fn label_drops_punctuation() {
    let result = ut_garment("Buzo (Oversize)!").conversation_label();
    assert_eq!(result.unwrap().as_str(), "buzooversize");
    let result = ut_garment("¿Poncho? ¡Sí!").conversation_label();
    assert_eq!(result.unwrap().as_str(), "ponchosi");
}

#[test]
fn label_keeps_allowed_symbols() {
    let result = ut_garment("manga_larga-2024").conversation_label();
    assert_eq!(result.unwrap().as_str(), "manga_larga-2024");
}

#[test]
fn label_multi_word_collapses() {
    let result = ut_garment("  Campera   De  Jean ").conversation_label();
    assert_eq!(result.unwrap().as_str(), "camperadejean");
}

#[test]
fn label_empty_after_filtering() {
    let result = ut_garment("¡¿!?").conversation_label();
    assert!(result.is_none());
    let result = ut_garment("").conversation_label();
    assert!(result.is_none());
}
