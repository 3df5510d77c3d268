use super::*;

#[test]
fn extensions_match_token_values() {
    assert_eq!(ImageCodec::Png.extension(), "png");
    assert_eq!(ImageCodec::Jpeg.extension(), "jpeg");
    assert_eq!(ImageCodec::Bmp.extension(), "bmp");
    assert_eq!(ImageCodec::Exr.extension(), "exr");
}

#[test]
fn transparency_promotes_only_alpha_less_codecs() {
    assert_eq!(ImageCodec::Jpeg.for_transparency(true), ImageCodec::Png);
    assert_eq!(ImageCodec::Bmp.for_transparency(true), ImageCodec::Png);
    assert_eq!(ImageCodec::Exr.for_transparency(true), ImageCodec::Exr);
    assert_eq!(ImageCodec::Jpeg.for_transparency(false), ImageCodec::Jpeg);
}

#[test]
fn only_exr_keeps_float_data() {
    assert!(ImageCodec::Png.requires_8bit());
    assert!(ImageCodec::Jpeg.requires_8bit());
    assert!(ImageCodec::Bmp.requires_8bit());
    assert!(!ImageCodec::Exr.requires_8bit());
}

#[test]
fn deserializes_engine_spelling() {
    let c: ImageCodec = serde_json::from_str("\"EXR\"").unwrap();
    assert_eq!(c, ImageCodec::Exr);
    let c: ImageCodec = serde_json::from_str("\"jpeg\"").unwrap();
    assert_eq!(c, ImageCodec::Jpeg);
}

#[test]
fn from_extension_accepts_jpg() {
    assert_eq!(ImageCodec::from_extension("JPG"), Some(ImageCodec::Jpeg));
    assert_eq!(ImageCodec::from_extension("tiff"), None);
}
