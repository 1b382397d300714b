use pretty_assertions::assert_eq;
use rstest::rstest;
use vbsync_content::{Error, LegacyCodec, TextSource, decode_local};

#[rstest]
#[case("windows-1252")]
#[case("cp1252")]
#[case("latin1")]
#[case(" Windows-1252 ")]
fn test_for_label_resolves_windows_1252(#[case] label: &str) {
    let codec = LegacyCodec::for_label(label).unwrap();
    assert_eq!(codec.name(), "windows-1252");
    assert_eq!(codec, LegacyCodec::default());
}

#[test]
fn test_for_label_unknown() {
    let err = LegacyCodec::for_label("klingon").unwrap_err();
    assert!(matches!(err, Error::UnknownEncoding { .. }));
}

#[test]
fn test_for_label_rejects_multibyte() {
    let err = LegacyCodec::for_label("utf-8").unwrap_err();
    assert!(matches!(err, Error::NotSingleByte { .. }));
}

#[test]
fn test_encode_representable_text() {
    let codec = LegacyCodec::windows_1252();
    let encoded = codec.encode("' Größe: 5 €\r\n");
    assert!(!encoded.is_lossy());
    assert_eq!(codec.decode(&encoded.bytes), "' Größe: 5 €\r\n");
}

#[test]
fn test_encode_replaces_unmappable_with_question_mark() {
    let codec = LegacyCodec::windows_1252();
    let encoded = codec.encode("MsgBox \"✓ done 日本\"");
    assert_eq!(encoded.bytes, b"MsgBox \"? done ??\"".to_vec());
    assert_eq!(encoded.lost_chars(), vec!['✓', '日', '本']);
}

#[test]
fn test_encode_long_input_spans_buffer_chunks() {
    let codec = LegacyCodec::windows_1252();
    let text = "é→".repeat(5000);
    let encoded = codec.encode(&text);
    assert_eq!(encoded.bytes.len(), 10_000);
    assert_eq!(encoded.unmappable.len(), 5000);
}

#[test]
fn test_decode_local_prefers_utf8() {
    let codec = LegacyCodec::windows_1252();
    let (text, source) = decode_local("Größe".as_bytes(), &codec);
    assert_eq!(text, "Größe");
    assert_eq!(source, TextSource::Utf8);
}

#[test]
fn test_decode_local_strips_bom() {
    let codec = LegacyCodec::windows_1252();
    let (text, source) = decode_local(b"\xEF\xBB\xBFSub A()", &codec);
    assert_eq!(text, "Sub A()");
    assert_eq!(source, TextSource::Utf8);
}

#[test]
fn test_decode_local_falls_back_to_legacy() {
    let codec = LegacyCodec::windows_1252();
    let (text, source) = decode_local(b"Gr\xF6\xDFe \x80", &codec);
    assert_eq!(text, "Größe €");
    assert_eq!(source, TextSource::Legacy);
}
