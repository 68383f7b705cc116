use siq_reader::siq::markdown::{self, RenderOptions};
use siq_reader::siq::models::is_well_known_type;
use siq_reader::siq::schema::{self, SchemaVersion};
use siq_reader::siq::{normalize, resolve};
use siq_reader::{
    Atom, Global, GlobalEntry, Info, ParamPayload, QuestionV4, SiqError,
};

fn sample_global() -> Global {
    Global {
        authors: vec![GlobalEntry {
            id: "author1".to_string(),
            name: "John Doe".to_string(),
        }],
        sources: vec![GlobalEntry {
            id: "source1".to_string(),
            name: "Test Book".to_string(),
        }],
    }
}

#[test]
fn detect_classifies_by_namespace_marker() {
    let v4 = r#"<package xmlns="http://vladimirkhil.com/ygpackage3.0.xsd"></package>"#;
    let v5 = r#"<package id="p" name="n"></package>"#;
    assert_eq!(schema::detect(v4), SchemaVersion::V4);
    assert_eq!(schema::detect(v5), SchemaVersion::V5);

    // The heuristic is a raw substring scan; the marker matches even outside
    // the root element.
    let marker_in_comment = r#"<package><info><comments>
        <comment>xmlns="http://vladimirkhil.com/ygpackage3.0.xsd"</comment>
    </comments></info></package>"#;
    assert_eq!(schema::detect(marker_in_comment), SchemaVersion::V4);
}

#[test]
fn resolver_returns_non_references_unchanged() {
    let global = sample_global();
    let first = resolve::reference("Direct text", Some(&global)).expect("non-reference");
    assert_eq!(first, "Direct text");

    // Idempotent on non-reference input.
    let second = resolve::reference(&first, Some(&global)).expect("non-reference again");
    assert_eq!(second, first);
}

#[test]
fn resolver_looks_up_authors_then_sources() {
    let global = sample_global();
    assert_eq!(
        resolve::reference("@author1", Some(&global)).expect("author"),
        "John Doe"
    );
    assert_eq!(
        resolve::reference("@source1", Some(&global)).expect("source"),
        "Test Book"
    );
    assert_eq!(
        resolve::reference("@source1#p.123", Some(&global)).expect("with specification"),
        "Test Book p.123"
    );
}

#[test]
fn resolver_misses_carry_the_original_token() {
    let global = sample_global();
    let err = resolve::reference("@missing#ch.2", Some(&global)).unwrap_err();
    match err {
        SiqError::ReferenceNotFound { token } => assert_eq!(token, "@missing#ch.2"),
        other => panic!("expected ReferenceNotFound, got {other:?}"),
    }

    // A package without a global table resolves nothing.
    let err = resolve::reference("@author1", None).unwrap_err();
    assert!(matches!(err, SiqError::ReferenceNotFound { .. }));
}

#[test]
fn normalizer_assigns_simple_and_preserves_answers() {
    let v4 = QuestionV4 {
        price: 200,
        scenario: vec![
            Atom {
                atom_type: "text".to_string(),
                duration: 0,
                text: "First".to_string(),
            },
            Atom {
                atom_type: "audio".to_string(),
                duration: 10,
                text: "clip.mp3".to_string(),
            },
        ],
        right: vec!["a".to_string(), "b".to_string()],
        wrong: vec!["c".to_string()],
        info: Some(Info {
            authors: vec!["Author".to_string()],
            ..Info::default()
        }),
    };

    let question = normalize::question(&v4);
    assert_eq!(question.question_type, "simple");
    assert_eq!(question.right, v4.right);
    assert_eq!(question.wrong, v4.wrong);
    assert_eq!(
        question.info.as_ref().map(|i| i.authors.as_slice()),
        Some(["Author".to_string()].as_slice())
    );

    assert_eq!(question.params.len(), 1);
    assert_eq!(question.params[0].name, "question");
    let ParamPayload::Content(items) = &question.params[0].payload else {
        panic!("expected a content param");
    };
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].value, "First");
    assert_eq!(items[1].content_type, "audio");
    assert_eq!(items[1].duration, 10);
}

#[test]
fn normalizer_without_scenario_yields_no_params() {
    let v4 = QuestionV4 {
        price: 100,
        scenario: Vec::new(),
        right: vec!["only".to_string()],
        wrong: Vec::new(),
        info: None,
    };
    let question = normalize::question(&v4);
    assert_eq!(question.question_type, "simple");
    assert!(question.params.is_empty());
    assert!(question.content().is_empty());
}

#[test]
fn unknown_question_types_pass_through() {
    let payload = r#"<package id="p" name="n">
        <round name="r">
            <theme name="t">
                <question type="myCustomType">
                    <right><answer>yes</answer></right>
                </question>
            </theme>
        </round>
    </package>"#;
    let package = schema::decode(payload, SchemaVersion::V5).expect("decode");
    let questions = package.all_questions();
    assert_eq!(questions[0].question_type, "myCustomType");
    assert!(!is_well_known_type("myCustomType"));
    assert!(is_well_known_type("bagCat"));
}

#[test]
fn param_accessors_distinguish_payload_shapes() {
    let payload = r#"<package id="p" name="n">
        <round name="r">
            <theme name="t">
                <question type="cat">
                    <params>
                        <param name="theme" type="simple">Secret theme</param>
                        <param name="price" type="numberSet">
                            <minimum>100</minimum>
                            <maximum>500</maximum>
                            <step>100</step>
                        </param>
                        <param name="question" type="content">
                            <item type="text">Guess</item>
                        </param>
                    </params>
                    <right><answer>42</answer></right>
                </question>
            </theme>
        </round>
    </package>"#;
    let package = schema::decode(payload, SchemaVersion::V5).expect("decode");
    let questions = package.all_questions();
    let question = &questions[0];

    assert_eq!(question.param_value("theme"), Some("Secret theme"));
    assert_eq!(question.param_value("question"), None);
    assert_eq!(question.param_value("absent"), None);
    assert_eq!(question.param_items("question").len(), 1);
    assert!(question.param_items("theme").is_empty());
    assert!(question.param_items("absent").is_empty());

    let number_set = question
        .params
        .iter()
        .find(|p| p.name == "price")
        .expect("price param");
    let ParamPayload::NumberSet(bounds) = &number_set.payload else {
        panic!("expected a numberSet param");
    };
    assert_eq!((bounds.minimum, bounds.maximum, bounds.step), (100, 500, 100));
}

#[test]
fn group_params_and_scripts_decode() {
    let payload = r#"<package id="p" name="n">
        <round name="r">
            <theme name="t">
                <question type="complex">
                    <params>
                        <param name="answerOptions" type="group">
                            <param name="A" type="simple">hidden</param>
                            <param name="B" type="content">
                                <item type="text">option text</item>
                            </param>
                        </param>
                    </params>
                    <script>options.shuffle()</script>
                    <right><answer>A</answer></right>
                </question>
            </theme>
        </round>
    </package>"#;
    let package = schema::decode(payload, SchemaVersion::V5).expect("decode");
    let questions = package.all_questions();
    let question = &questions[0];

    assert_eq!(question.script.as_deref(), Some("options.shuffle()"));

    let group = question
        .params
        .iter()
        .find(|p| p.name == "answerOptions")
        .expect("group param");
    let ParamPayload::Group(members) = &group.payload else {
        panic!("expected a group param");
    };
    assert_eq!(members.len(), 2);
    assert_eq!(members[0].name, "A");
    let ParamPayload::Value { value, .. } = &members[0].payload else {
        panic!("expected a scalar member");
    };
    assert_eq!(value, "hidden");
    let ParamPayload::Content(items) = &members[1].payload else {
        panic!("expected a content member");
    };
    assert_eq!(items[0].value, "option text");

    // Group params are neither scalars nor content for the named accessors.
    assert_eq!(question.param_value("answerOptions"), None);
    assert!(question.param_items("answerOptions").is_empty());
}

#[test]
fn bom_prefixed_payload_decodes() {
    let payload = "\u{feff}<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
        <package id=\"bom\" name=\"n\">\
            <round name=\"r\">\
                <theme name=\"t\">\
                    <question type=\"simple\">\
                        <right><answer>ok</answer></right>\
                    </question>\
                </theme>\
            </round>\
        </package>";
    assert_eq!(schema::detect(payload), SchemaVersion::V5);
    let package = schema::decode(payload, SchemaVersion::V5).expect("decode");
    assert_eq!(package.id, "bom");
    assert_eq!(package.question_count(), 1);
}

#[test]
fn markdown_renders_headings_and_answers() {
    let payload = r#"<package id="p" name="Quiz Night">
        <round name="Opening Round">
            <theme name="Geography">
                <question type="simple">
                    <params>
                        <param name="question" type="content">
                            <item type="text">Capital of France?</item>
                        </param>
                    </params>
                    <right><answer>Paris</answer></right>
                </question>
            </theme>
        </round>
    </package>"#;
    let package = schema::decode(payload, SchemaVersion::V5).expect("decode");
    let report = markdown::render(&package);

    assert!(report.contains("## Round 1: Opening Round"));
    assert!(report.contains("### Theme 1: Geography"));
    assert!(report.contains("#### Question 1"));
    assert!(report.contains("- Capital of France?"));
    assert!(report.contains("**Right Answer**:\n\nParis"));
    assert!(report.contains("---"));
}

#[test]
fn markdown_annotates_non_screen_placements_only() {
    let payload = r#"<package id="p" name="n">
        <round name="r">
            <theme name="t">
                <question type="simple">
                    <params>
                        <param name="question" type="content">
                            <item type="text">On screen by default</item>
                            <item type="text" placement="screen">Explicit screen</item>
                            <item type="text" placement="replic">Spoken aside</item>
                        </param>
                    </params>
                    <right><answer>ok</answer></right>
                </question>
            </theme>
        </round>
    </package>"#;
    let package = schema::decode(payload, SchemaVersion::V5).expect("decode");

    let questions = package.all_questions();
    let content = questions[0].content();
    assert_eq!(content[0].placement_or_default(), "screen");
    assert_eq!(content[1].placement_or_default(), "screen");
    assert_eq!(content[2].placement_or_default(), "replic");

    let report = markdown::render(&package);
    assert!(report.contains("- On screen by default\n"));
    assert!(report.contains("- Explicit screen\n"));
    assert!(!report.contains("(placement: screen)"));
    assert!(report.contains("- Spoken aside (placement: replic)"));
}

#[test]
fn markdown_skip_media_drops_media_questions_and_empty_themes() {
    let payload = r#"<package id="p" name="n">
        <round name="Mixed">
            <theme name="Words">
                <question type="simple">
                    <params>
                        <param name="question" type="content">
                            <item type="text">Plain text question</item>
                        </param>
                    </params>
                    <right><answer>ok</answer></right>
                </question>
                <question type="simple">
                    <params>
                        <param name="question" type="content">
                            <item type="image">picture.png</item>
                        </param>
                    </params>
                    <right><answer>skipped</answer></right>
                </question>
            </theme>
            <theme name="Clips">
                <question type="simple">
                    <params>
                        <param name="question" type="content">
                            <item type="audio">clip.mp3</item>
                        </param>
                    </params>
                    <right><answer>also skipped</answer></right>
                </question>
            </theme>
        </round>
    </package>"#;
    let package = schema::decode(payload, SchemaVersion::V5).expect("decode");

    let full = markdown::render(&package);
    assert!(full.contains("### Theme 2: Clips"));
    assert!(full.contains("picture.png"));

    let filtered = markdown::render_with(&package, &RenderOptions { skip_media: true });
    assert!(filtered.contains("Plain text question"));
    assert!(!filtered.contains("picture.png"));
    assert!(!filtered.contains("Clips"), "empty themes are dropped");
}

#[test]
fn markdown_normalizes_v4_rounds_before_rendering() {
    let payload = r#"<package xmlns="http://vladimirkhil.com/ygpackage3.0.xsd" id="p" name="n">
        <rounds>
            <round name="Legacy Round">
                <themes>
                    <theme name="Old Theme">
                        <questions>
                            <question price="100">
                                <scenario>
                                    <atom type="text">From the old days</atom>
                                </scenario>
                                <right><answer>still works</answer></right>
                            </question>
                        </questions>
                    </theme>
                </themes>
            </round>
        </rounds>
    </package>"#;
    let version = schema::detect(payload);
    assert_eq!(version, SchemaVersion::V4);
    let package = schema::decode(payload, version).expect("decode");

    let report = markdown::render(&package);
    assert!(report.contains("## Round 1: Legacy Round"));
    assert!(report.contains("### Theme 1: Old Theme"));
    assert!(report.contains("- From the old days"));
    assert!(report.contains("still works"));
}
