use reqdoc::reqdoc::ast::{RequestSummary, RequestType};
use reqdoc::reqdoc::formats::FormatRegistry;
use reqdoc::reqdoc::testing::Samples;

#[test]
fn summary_of_basic_request() {
    let doc = Samples::parse("request-basic.reqdoc").unwrap();
    let summary = RequestSummary::from_document(&doc);
    assert_eq!(summary.name.as_deref(), Some("Get users"));
    assert_eq!(summary.request_type, RequestType::Http);
    assert_eq!(summary.method.as_deref(), Some("GET"));
    assert_eq!(summary.url.as_deref(), Some("https://api.example.com/users"));
    assert_eq!(summary.body_mode, "none");
    assert_eq!(summary.auth_mode, "none");
    assert_eq!(summary.seq.as_deref(), Some("1"));
}

#[test]
fn summary_of_full_request() {
    let doc = Samples::parse("request-full.reqdoc").unwrap();
    let summary = RequestSummary::from_document(&doc);
    assert_eq!(summary.method.as_deref(), Some("POST"));
    assert_eq!(summary.body_mode, "json");
    assert_eq!(summary.auth_mode, "bearer");
    assert_eq!(summary.tags, vec!["smoke", "users"]);
}

#[test]
fn samples_render_in_every_registered_format() {
    let registry = FormatRegistry::with_defaults();
    for sample in Samples::all() {
        let doc = Samples::parse(sample.name).unwrap();
        for format in registry.list_formats() {
            let output = registry.serialize(&doc, &format);
            assert!(output.is_ok(), "{} as {}: {:?}", sample.name, format, output);
        }
    }
}
