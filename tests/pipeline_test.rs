use chrono::NaiveDate;
use page_clipper::config::ExtractionOptions;
use page_clipper::convert::MarkdownConverter;
use page_clipper::dom::Document;
use page_clipper::launch::{encode_component, RecordingNavigator};
use page_clipper::prompt::{ScriptedPrompter, CAPTURE_MODE_PROMPT, INVALID_CHOICE_ALERT};
use page_clipper::{
    CaptureMode, ClipperConfig, Clipper, Collaborators, ContentExtractor, Error, PageSnapshot, ReadableArticle,
};
use url::Url;

/// Extractor returning a fixed article, or nothing.
struct StubExtractor(Option<&'static str>);

impl ContentExtractor for StubExtractor {
    fn extract(&self, _doc: &Document, _url: &Url, _options: &ExtractionOptions) -> Option<ReadableArticle> {
        self.0.map(|content| ReadableArticle {
            title: "Stub Title".to_string(),
            byline: Some("Stub Byline".to_string()),
            content: content.to_string(),
        })
    }
}

fn capture_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

fn clipper_with(config: ClipperConfig, article: Option<&'static str>) -> Clipper {
    let converter = MarkdownConverter::new(config.note.image_link_fixup);
    Clipper::new(config, Collaborators::new(Box::new(StubExtractor(article)), converter))
        .with_capture_date(capture_date())
}

const AI_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>AI: The Next Wave?</title>
    <meta name="description" content="Where AI goes next">
</head>
<body>
    <nav><a href="/">Home</a></nav>
    <article>
        <p>Models keep getting better.</p>
    </article>
</body>
</html>"#;

fn ai_snapshot() -> PageSnapshot {
    PageSnapshot::new(AI_PAGE, Url::parse("https://news.example.com/ai/next-wave").unwrap())
}

// ============================================================================
// END-TO-END CAPTURES
// ============================================================================

#[test]
fn title_with_reserved_chars_and_no_date_meta() {
    let clipper = clipper_with(ClipperConfig::default(), Some("<p>Models keep getting better.</p>"));
    let mut prompter = ScriptedPrompter::answering("2");
    let mut navigator = RecordingNavigator::default();

    let outcome = clipper.run(&ai_snapshot(), &mut prompter, &mut navigator).expect("capture failed");

    assert!(outcome.content.contains("\nsource_date: 2024-03-01\n"));
    assert!(outcome.content.contains("\ntitle: \"AI The Next Wave\"\n"));
    assert!(outcome.content.contains("\n# AI The Next Wave\n"));
    assert_eq!(outcome.hand_off.target.file_name, "2024-03-01-AI The Next Wave");
    assert!(outcome.content.ends_with("Models keep getting better.\n"));
}

#[test]
fn hand_off_url_carries_encoded_note() {
    let clipper = clipper_with(ClipperConfig::default(), Some("<p>Body</p>"));
    let mut prompter = ScriptedPrompter::answering("2");
    let mut navigator = RecordingNavigator::default();

    let outcome = clipper.run(&ai_snapshot(), &mut prompter, &mut navigator).unwrap();

    let expected = format!(
        "obsidian://new?file={}&content={}&vault=Main",
        encode_component("References/Capture/2024-03-01-AI The Next Wave"),
        encode_component(&outcome.content)
    );
    assert_eq!(navigator.visited, vec![expected]);
    assert_eq!(prompter.questions, vec![CAPTURE_MODE_PROMPT]);
}

#[test]
fn front_matter_standard_layout() {
    let clipper = clipper_with(ClipperConfig::default(), Some("<p>Body</p>"));
    let mut navigator = RecordingNavigator::default();
    let outcome = clipper.run(&ai_snapshot(), &mut ScriptedPrompter::answering("2"), &mut navigator).unwrap();

    let keys: Vec<&str> = outcome.document.header.keys().collect();
    assert_eq!(
        keys,
        vec![
            "id",
            "title",
            "author",
            "tags",
            "created_date",
            "modified_date",
            "source",
            "source_date",
            "source_title",
            "source_description"
        ]
    );
    assert!(outcome.content.starts_with("---\nid: \""));
    assert!(outcome.content.contains("author: \"[[Stub Byline]]\"\n"));
    assert!(outcome.content.contains("tags:\n  - AI\n"));
    assert!(outcome.content.contains("source: https://news.example.com/ai/next-wave\n"));
    assert!(outcome.content.contains("source_description: \"Where AI goes next\"\n"));
}

#[test]
fn publication_date_from_meta() {
    let html = AI_PAGE.replace(
        "<meta name=\"description\"",
        "<meta property=\"article:published_time\" content=\"2023-11-05T09:00:00+02:00\"><meta name=\"description\"",
    );
    let snapshot = PageSnapshot::new(html, Url::parse("https://news.example.com/a").unwrap());
    let clipper = clipper_with(ClipperConfig::default(), Some("<p>Body</p>"));

    let outcome = clipper
        .run(&snapshot, &mut ScriptedPrompter::answering("1"), &mut RecordingNavigator::default())
        .unwrap();

    assert_eq!(outcome.mode, CaptureMode::MetadataOnly);
    assert!(outcome.content.contains("source_date: 2023-11-05\n"));
    assert!(outcome.content.contains("created_date: 2024-03-01\n"));
    assert!(outcome.content.contains("tags:\n  - AI\n  - link\n"));
    assert!(!outcome.content.contains("Body"));
}

#[test]
fn user_selection_is_captured_instead_of_article() {
    let snapshot = ai_snapshot().with_selection(vec![
        r#"<p>Selected <a href="../refs">text</a></p>"#.to_string(),
        "<script>track()</script><p>second range</p>".to_string(),
    ]);
    let clipper = clipper_with(ClipperConfig::default(), None);

    let outcome = clipper
        .run(&snapshot, &mut ScriptedPrompter::answering("2"), &mut RecordingNavigator::default())
        .unwrap();

    assert!(outcome.content.contains("Selected [text](https://news.example.com/refs)\n\nsecond range"));
    assert!(!outcome.content.contains("track"));
}

// ============================================================================
// ABORTED CAPTURES
// ============================================================================

#[test]
fn invalid_mode_answer_aborts_without_navigation() {
    let clipper = clipper_with(ClipperConfig::default(), Some("<p>Body</p>"));
    let mut prompter = ScriptedPrompter::answering("3");
    let mut navigator = RecordingNavigator::default();

    let err = clipper.run(&ai_snapshot(), &mut prompter, &mut navigator).unwrap_err();

    assert!(matches!(err, Error::InvalidCaptureMode(_)));
    assert!(navigator.visited.is_empty());
    assert_eq!(prompter.alerts, vec![INVALID_CHOICE_ALERT]);
}

#[test]
fn no_content_aborts_before_prompt() {
    let clipper = clipper_with(ClipperConfig::default(), None);
    let mut prompter = ScriptedPrompter::answering("2");
    let mut navigator = RecordingNavigator::default();

    let err = clipper.run(&ai_snapshot(), &mut prompter, &mut navigator).unwrap_err();

    assert!(matches!(err, Error::NoContent));
    assert!(prompter.questions.is_empty());
    assert!(navigator.visited.is_empty());
    assert_eq!(prompter.alerts, vec!["No readable content found on this page"]);
}

#[test]
fn metadata_only_preset_needs_no_content() {
    let config = ClipperConfig::preset("link").unwrap();
    let clipper = clipper_with(config, None);
    let mut prompter = ScriptedPrompter::default();
    let mut navigator = RecordingNavigator::default();

    let outcome = clipper.run(&ai_snapshot(), &mut prompter, &mut navigator).unwrap();

    assert_eq!(outcome.mode, CaptureMode::MetadataOnly);
    assert!(prompter.questions.is_empty());
    assert!(outcome.content.ends_with("# AI The Next Wave\n[Read more](https://news.example.com/ai/next-wave)\n"));
    assert_eq!(navigator.visited.len(), 1);
}

// ============================================================================
// PRESETS
// ============================================================================

#[test]
fn clippings_preset_layout() {
    let config = ClipperConfig::preset("clippings").unwrap();
    let clipper = clipper_with(config, Some(r#"<p><a href="/full.png"><img src="/thumb.png" alt="pic"></a></p>"#));
    let mut navigator = RecordingNavigator::default();

    let outcome = clipper.run(&ai_snapshot(), &mut ScriptedPrompter::answering("2"), &mut navigator).unwrap();

    assert!(outcome.content.starts_with("---\ncategory: \"[[Clippings]]\"\n"));
    assert!(outcome.content.contains("clipped: 2024-03-01\n"));
    assert!(outcome.content.contains("publish: false\n---\n"));
    assert!(outcome
        .content
        .contains("[![pic](https://news.example.com/thumb.png)](https://news.example.com/full.png)"));
    assert_eq!(outcome.hand_off.target.path(), "Ressources/2024-03-01-AI The Next Wave");
}

#[cfg(feature = "readability")]
#[test]
fn default_collaborators_extract_article() {
    let html = r#"<!DOCTYPE html>
<html>
<head><title>Readable Page</title><meta name="author" content="Jane Roe"></head>
<body>
    <nav><a href="/">Home</a> | <a href="/archive">Archive</a></nav>
    <article>
        <h1>Readable Page</h1>
        <p>The first paragraph explains the subject at length, with enough words
        to clear the extraction threshold comfortably and then some more.</p>
        <p>The second paragraph adds detail, with a <a href="/detail">link</a> that
        should come out absolute in the final note once the page is captured.</p>
        <p>The third paragraph closes the article with a short conclusion that is
        still long enough to count as real prose for the extractor.</p>
    </article>
    <footer>Copyright 2024</footer>
</body>
</html>"#;
    let snapshot = PageSnapshot::new(html, Url::parse("https://blog.example.com/posts/readable").unwrap());
    let config = ClipperConfig::default();
    let clipper = Clipper::new(config.clone(), Collaborators::load(&config).unwrap()).with_capture_date(capture_date());

    let outcome = clipper
        .run(&snapshot, &mut ScriptedPrompter::answering("2"), &mut RecordingNavigator::default())
        .unwrap();

    assert!(outcome.content.contains("The first paragraph explains"));
    assert!(outcome.content.contains("(https://blog.example.com/detail)"));
    assert!(!outcome.content.contains("Copyright 2024"));
    assert_eq!(outcome.metadata.title, "Readable Page");
}
