use super::*;
use crate::animation::{ElementStyle, Stagger};
use crate::gesture::{classify_swipe, ScrollLock, SwipeTracker};
use crate::location::{fragment_for_slide, slide_from_fragment};
use crate::reveal::RevealObserver;
use crate::scheduler::Scheduler;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

const DEMO_DECK: &str = include_str!("../demos/deck.html");

fn create_temp_script_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes()).expect("Failed to write to temp file");
    file
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

#[test]
fn test_scheduler_fires_in_due_order() {
    let mut scheduler = Scheduler::new();
    scheduler.schedule(ms(300), "late");
    scheduler.schedule(ms(100), "early");
    scheduler.schedule(ms(100), "early-second");

    let mut fired = Vec::new();
    while let Some((_, task)) = scheduler.pop_due(ms(1000)) {
        fired.push(task);
    }

    assert_eq!(fired, vec!["early", "early-second", "late"]);
    assert_eq!(scheduler.now(), ms(1000));
}

#[test]
fn test_scheduler_cancel() {
    let mut scheduler = Scheduler::new();
    let keep = scheduler.schedule(ms(50), 1);
    let dropped = scheduler.schedule(ms(60), 2);

    assert!(scheduler.cancel(dropped));
    assert!(!scheduler.cancel(dropped), "second cancel should report nothing to cancel");
    assert!(scheduler.is_pending(keep));
    assert_eq!(scheduler.pending(), 1);

    assert_eq!(scheduler.pop_due(ms(40)), None);
    assert_eq!(scheduler.now(), ms(40));
    assert_eq!(scheduler.pop_due(ms(100)).map(|(_, task)| task), Some(1));
    assert_eq!(scheduler.pop_due(ms(100)), None);
}

#[test]
fn test_scheduler_delay_is_relative_to_now() {
    let mut scheduler = Scheduler::new();
    assert_eq!(scheduler.pop_due(ms(500)), None);
    scheduler.schedule(ms(100), ());
    assert_eq!(scheduler.next_due(), Some(ms(600)));
}

#[test]
fn test_fragment_parsing() {
    assert_eq!(slide_from_fragment("4", 10), Some(3));
    assert_eq!(slide_from_fragment("#4", 10), Some(3));
    assert_eq!(slide_from_fragment("10", 10), Some(9));
    assert_eq!(slide_from_fragment("11", 10), None);
    assert_eq!(slide_from_fragment("0", 10), None);
    assert_eq!(slide_from_fragment("-1", 10), None);
    assert_eq!(slide_from_fragment("abc", 10), None);
    assert_eq!(slide_from_fragment("4abc", 10), Some(3));
    assert_eq!(slide_from_fragment("5.0", 10), Some(4));
    assert_eq!(slide_from_fragment(" 7", 10), Some(6));
    assert_eq!(slide_from_fragment("+2", 10), Some(1));
    assert_eq!(slide_from_fragment("0x3", 10), None);
    assert_eq!(slide_from_fragment("99999999999999999999999", 10), None);
    assert_eq!(slide_from_fragment("", 10), None);
    assert_eq!(fragment_for_slide(0), "1");
}

#[test]
fn test_location_set_hash_reports_changes() {
    let mut location = Location::parse("https://deck.example/talk.html").unwrap();
    assert_eq!(location.hash(), None);

    assert!(location.set_hash("#2"));
    assert_eq!(location.hash(), Some("2"));
    assert_eq!(location.url().as_str(), "https://deck.example/talk.html#2");

    assert!(!location.set_hash("2"), "same fragment is not a change");
    assert_eq!(location.slide(5), Some(1));
    assert_eq!(location.slide(1), None);
}

#[test]
fn test_key_mapping() {
    assert_eq!(Key::from_dom(" "), Key::Space);
    assert_eq!(Key::from_dom("7"), Key::Digit(7));
    assert_eq!(Key::from_dom("Enter"), Key::Other("Enter".to_string()));

    assert_eq!(Key::ArrowDown.intent(5), Some(Intent::Next));
    assert_eq!(Key::ArrowRight.intent(5), Some(Intent::Next));
    assert_eq!(Key::Space.intent(5), Some(Intent::Next));
    assert_eq!(Key::ArrowUp.intent(5), Some(Intent::Previous));
    assert_eq!(Key::ArrowLeft.intent(5), Some(Intent::Previous));
    assert_eq!(Key::Digit(3).intent(5), Some(Intent::Goto(2)));
    assert_eq!(Key::Digit(6).intent(5), None);
    assert_eq!(Key::Digit(0).intent(5), None);
}

#[test]
fn test_swipe_classification() {
    let start = Point::new(100.0, 400.0);
    assert_eq!(
        classify_swipe(start, Point::new(110.0, 340.0), 50.0),
        Some(Intent::Next)
    );
    assert_eq!(
        classify_swipe(start, Point::new(90.0, 460.0), 50.0),
        Some(Intent::Previous)
    );
    assert_eq!(classify_swipe(start, Point::new(160.0, 390.0), 50.0), None);
    assert_eq!(classify_swipe(start, Point::new(100.0, 370.0), 50.0), None);
}

#[test]
fn test_swipe_tracker_consumes_sample() {
    let mut tracker = SwipeTracker::default();
    assert_eq!(tracker.finish(Point::new(0.0, 0.0), 50.0), None);

    tracker.begin(Point::new(0.0, 200.0));
    assert!(tracker.in_progress());
    assert_eq!(tracker.finish(Point::new(0.0, 100.0), 50.0), Some(Intent::Next));
    assert!(!tracker.in_progress());
    assert_eq!(tracker.finish(Point::new(0.0, 0.0), 50.0), None);
}

#[test]
fn test_wheel_intent_respects_bounds() {
    assert_eq!(ScrollLock::wheel_intent(120.0, 0, 3), Some(Intent::Next));
    assert_eq!(ScrollLock::wheel_intent(120.0, 2, 3), None);
    assert_eq!(ScrollLock::wheel_intent(-3.0, 2, 3), Some(Intent::Previous));
    assert_eq!(ScrollLock::wheel_intent(-3.0, 0, 3), None);
    assert_eq!(ScrollLock::wheel_intent(0.0, 1, 3), None);
}

#[test]
fn test_parse_demo_deck() {
    let document = Document::parse_html(DEMO_DECK).expect("demo deck should parse");

    assert_eq!(document.title, "Spotting Scams Online");
    assert_eq!(document.len(), 5);
    assert_eq!(document.slides()[0].title, "Spotting Scams Online");
    assert_eq!(document.slides()[0].id.as_deref(), Some("intro"));
    assert_eq!(document.slides()[1].title, "Warning signs");

    // h2 + three signs, each with an h3 and a p
    assert_eq!(document.slides()[1].animated_positions().len(), 10);
    assert_eq!(document.reveal_targets().len(), 3 + 2 + 3);

    let quiz = document.slides()[3].quiz.as_ref().expect("quiz slide");
    assert_eq!(quiz.options.len(), 3);
    assert_eq!(quiz.options[1].label, "Call the number on your card");
    assert!(quiz.options[1].correct);
    assert!(!quiz.options[0].correct);
    assert!(document.slides()[0].quiz.is_none());
}

#[test]
fn test_parse_collects_nested_text() {
    let document = Document::parse_html(DEMO_DECK).unwrap();
    let sign = &document.slides()[1].elements[1];
    assert!(sign.has_class("sign"));
    assert_eq!(sign.text, "Urgency \"Act now or lose access!\"");
}

#[test]
fn test_parse_rejects_missing_chrome() {
    let no_dots = r#"<html><body><div class="progress-bar"></div>
        <div class="slide"><h2>One</h2></div></body></html>"#;
    assert!(matches!(
        Document::parse_html(no_dots),
        Err(DeckError::StructureError(_))
    ));

    let no_slides = r#"<html><body><div class="nav-dots"></div><div class="progress-bar"></div></body></html>"#;
    assert!(matches!(
        Document::parse_html(no_slides),
        Err(DeckError::StructureError(_))
    ));
}

#[test]
fn test_parse_tolerates_void_and_unclosed_tags() {
    let html = r#"<html><head><meta charset="UTF-8"><title>T</title></head><body>
        <div class="nav-dots"></div><div class="progress-bar"></div>
        <div class="slide"><h2>First<br>line</h2><p>open paragraph</div>
        <div class="slide"><img src="x.png"><p>second</p></div>
        </body></html>"#;
    let document = Document::parse_html(html).unwrap();

    assert_eq!(document.len(), 2);
    assert_eq!(document.slides()[0].elements.len(), 2);
    assert_eq!(document.slides()[0].elements[0].text, "First line");
    assert_eq!(document.slides()[1].elements[0].text, "second");
}

#[test]
fn test_parse_skips_script_bodies() {
    let html = r#"<html><body>
        <div class="nav-dots"></div><div class="progress-bar"></div>
        <div class="slide"><p>only slide</p></div>
        <script>if (a < b) { document.write('<div class="slide">'); }</script>
        </body></html>"#;
    let document = Document::parse_html(html).unwrap();
    assert_eq!(document.len(), 1);
}

#[test]
fn test_quiz_answer_round() {
    let messages = QuizMessages::default();
    let mut quiz = Quiz::new(vec![
        QuizOption::new("a", false),
        QuizOption::new("b", true),
    ]);

    assert_eq!(quiz.answer(0, &messages), Some(Verdict::Incorrect));
    assert!(quiz.is_answered());
    assert_eq!(quiz.options[0].mark, Some(Verdict::Incorrect));
    assert_eq!(quiz.options[1].mark, Some(Verdict::Correct));
    assert_eq!(quiz.feedback.class_name(), "quiz-feedback incorrect show");
    assert_eq!(quiz.feedback.text, messages.incorrect);

    assert_eq!(quiz.answer(1, &messages), None, "locked options ignore clicks");
    assert_eq!(quiz.answer(9, &messages), None);

    quiz.reset();
    assert!(!quiz.is_answered());
    assert!(quiz.options.iter().all(|o| o.enabled && o.mark.is_none()));
    assert_eq!(quiz.feedback.class_name(), "quiz-feedback");
    assert!(quiz.feedback.text.is_empty());
}

#[test]
fn test_reveal_threshold() {
    let target = ElementId { slide: 0, index: 2 };
    let other = ElementId { slide: 1, index: 0 };
    let mut observer = RevealObserver::new(0.1);
    observer.observe(target);

    assert!(observer.should_reveal(target, 0.1));
    assert!(observer.should_reveal(target, 1.0));
    assert!(!observer.should_reveal(target, 0.05));
    assert!(!observer.should_reveal(target, 0.0));
    assert!(!observer.should_reveal(other, 1.0));
}

#[test]
fn test_element_styles() {
    assert_eq!(
        ElementStyle::hidden().to_css(),
        "opacity: 0; transform: translateY(20px); transition: none"
    );
    assert_eq!(
        ElementStyle::entered(ms(600)).to_css(),
        "opacity: 1; transform: translateY(0px); transition: opacity 0.6s ease, transform 0.6s ease"
    );

    let stagger = Stagger {
        base: ms(100),
        step: ms(100),
    };
    let delays: Vec<Duration> = stagger.delays(3).collect();
    assert_eq!(delays, vec![ms(100), ms(200), ms(300)]);
}

#[test]
fn test_parse_script() {
    let script = "# tour\n0 key ArrowDown\n\n250 swipe 0 300 5 200\n900 hash #3\n1000 reveal 1 2 0.5\n1200 wait\n";
    let steps = parse_script(script).unwrap();

    assert_eq!(steps.len(), 5);
    assert_eq!(steps[0].events, vec![InputEvent::Key(Key::ArrowDown)]);
    assert_eq!(steps[1].at, ms(250));
    assert_eq!(steps[1].events.len(), 2);
    assert_eq!(steps[2].events, vec![InputEvent::HashChange("3".to_string())]);
    assert_eq!(
        steps[3].events,
        vec![InputEvent::Intersection {
            element: ElementId { slide: 1, index: 2 },
            ratio: 0.5
        }]
    );
    assert!(steps[4].events.is_empty());
    assert_eq!(steps[4].line, 7);
}

#[test]
fn test_parse_script_errors() {
    let backwards = parse_script("100 key Space\n50 key Space\n");
    assert!(matches!(backwards, Err(DeckError::ScriptError { line: 2, .. })));

    let unknown = parse_script("0 jump 3\n");
    assert!(matches!(unknown, Err(DeckError::ScriptError { line: 1, .. })));

    let bad_arg = parse_script("0 wheel lots\n");
    assert!(matches!(bad_arg, Err(DeckError::ScriptError { line: 1, .. })));

    let arity = parse_script("0 dot\n");
    assert!(matches!(arity, Err(DeckError::ScriptError { line: 1, .. })));
}

#[test]
fn test_load_script_file() {
    let file = create_temp_script_file("0 key 2\n10 dot 0\n");
    let steps = load_script(file.path()).unwrap();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].events, vec![InputEvent::Key(Key::Digit(2))]);
    assert_eq!(steps[1].events, vec![InputEvent::DotClick(0)]);
}

#[test]
fn test_quiz_correct_flag_is_exact() {
    let html = r#"<html><body><div class="nav-dots"></div><div class="progress-bar"></div>
        <div class="slide quiz-slide">
            <button class="quiz-option" data-correct="True">A</button>
            <button class="quiz-option" data-correct=" true">B</button>
            <button class="quiz-option" data-correct="true">C</button>
            <button class="quiz-option">D</button>
            <div class="quiz-feedback"></div>
        </div></body></html>"#;
    let document = Document::parse_html(html).unwrap();
    let quiz = document.slides()[0].quiz.as_ref().expect("quiz slide");
    let flags: Vec<bool> = quiz.options.iter().map(|option| option.correct).collect();
    assert_eq!(flags, vec![false, false, true, false]);
}

#[test]
fn test_quiz_parts_can_animate() {
    let html = r#"<html><body><div class="nav-dots"></div><div class="progress-bar"></div>
        <div class="slide quiz-slide">
            <h2>Pick one</h2>
            <p class="quiz-option" data-correct="true">Yes</p>
            <button class="quiz-option" data-correct="false">No</button>
            <p class="quiz-feedback"></p>
        </div></body></html>"#;
    let document = Document::parse_html(html).unwrap();
    let slide = &document.slides()[0];

    let tags: Vec<&str> = slide.elements.iter().map(|e| e.tag.as_str()).collect();
    assert_eq!(tags, vec!["h2", "p", "p"]);
    assert_eq!(slide.animated_positions(), vec![0, 1, 2]);
    assert!(slide.elements[2].has_class("quiz-feedback"));

    // The option keeps its quiz role and its label
    let quiz = slide.quiz.as_ref().expect("quiz slide");
    assert_eq!(quiz.options.len(), 2);
    assert_eq!(quiz.options[0].label, "Yes");
    assert_eq!(slide.elements[1].text, "Yes");
}

#[test]
fn test_document_requires_slides() {
    assert!(matches!(
        Document::new("Empty", Vec::new()),
        Err(DeckError::StructureError(_))
    ));

    let document = Document::new("One", vec![Slide::new("Only")]).unwrap();
    assert_eq!(document.len(), 1);
    assert_eq!(document.slides().len(), 1);
    assert!(document.slide(1).is_none());
    assert!(document.dots().is_empty());
}

#[test]
fn test_config_rejects_bad_thresholds() {
    assert!(Config::new().validate().is_ok());

    for threshold in [-0.5, 1.5, f64::NAN, f64::INFINITY] {
        let config = Config {
            reveal_threshold: threshold,
            ..Config::default()
        };
        assert!(
            matches!(config.validate(), Err(DeckError::ConfigError(_))),
            "reveal threshold {} should be rejected",
            threshold
        );
    }

    let config = Config {
        swipe_threshold_px: -1.0,
        ..Config::default()
    };
    assert!(matches!(config.validate(), Err(DeckError::ConfigError(_))));
}

#[test]
fn test_config_defaults() {
    let config = Config::new();
    let navigator = config.get_navigator_config();
    assert_eq!(navigator.scroll_lock, ms(800));
    assert_eq!(navigator.swipe_threshold, 50.0);
    assert_eq!(navigator.quiz_reset, ms(5000));
    assert_eq!(navigator.reveal_threshold, 0.1);

    let favicon = config.get_favicon_config(None, Some("out/icon.ico".into()), None);
    assert_eq!(favicon.output_dir, std::path::PathBuf::from("assets/images"));
    assert_eq!(favicon.ico_path, std::path::PathBuf::from("out/icon.ico"));
    assert_eq!(favicon.targets.len(), 5);
    assert_eq!(favicon.ico_size, 64);
    assert!(favicon.logo.is_none());
}

#[test]
fn test_resource_file_remote_detection() {
    assert!(ResourceFile::new("https://example.com/logo.svg").is_remote);
    assert!(!ResourceFile::new("assets/logo.svg").is_remote);
    assert!(matches!(
        ResourceFile::new("/definitely/missing/logo.svg").bytes(),
        Err(DeckError::PathNotFoundError(_))
    ));
}

#[test]
fn test_render_outline_and_status() {
    let document = Document::parse_html(DEMO_DECK).unwrap();
    let outline = render_outline(&document);
    assert!(outline.starts_with("Spotting Scams Online - 5 slides"));
    assert!(outline.contains("Call the number on your card (correct)"));

    let location = Location::parse("https://deck.example/").unwrap();
    let mut navigator = Navigator::new(document, location, NavigatorConfig::default());
    navigator.go_to_slide(1);
    let status = render_status(&navigator);
    assert!(status.starts_with("slide 2/5 ○●○○○ 40% #2"), "got {status}");
    assert!(status.contains("entering"));
}
