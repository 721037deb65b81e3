// ABOUTME: Document model for single-page slide decks
// ABOUTME: Loads slides, content elements, quiz blocks and chrome markers from deck HTML

use crate::animation::ElementStyle;
use crate::errors::{DeckError, Result};
use crate::quiz::{Quiz, QuizOption};
use log::{debug, info, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs;
use std::path::Path;

/// Tags whose elements take part in the slide entrance animation.
pub const ENTRANCE_TAGS: &[&str] = &["h2", "h3", "p"];

/// Classes whose elements take part in the entrance animation and scroll reveal.
pub const REVEAL_CLASSES: &[&str] = &["card", "sign", "example-card", "practice"];

/// HTML elements that never have a closing tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Address of a content element: slide position and position within the slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId {
    pub slide: usize,
    pub index: usize,
}

/// A content element a deck script animates or reveals.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub classes: Vec<String>,
    pub text: String,
    pub style: ElementStyle,
    /// Set once the element scrolled into view; never cleared.
    pub revealed: bool,
}

impl Element {
    pub fn new(tag: &str, classes: &[&str]) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            text: String::new(),
            style: ElementStyle::default(),
            revealed: false,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Matches `h2, h3, p, .card, .sign, .example-card, .practice`.
    pub fn animates(&self) -> bool {
        ENTRANCE_TAGS.contains(&self.tag.as_str()) || self.reveals()
    }

    /// Matches `.card, .sign, .example-card, .practice`.
    pub fn reveals(&self) -> bool {
        REVEAL_CLASSES.iter().any(|class| self.has_class(class))
    }
}

/// One `.slide` container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slide {
    pub id: Option<String>,
    pub title: String,
    pub active: bool,
    pub elements: Vec<Element>,
    pub quiz: Option<Quiz>,
}

impl Slide {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    pub fn with_quiz(mut self, quiz: Quiz) -> Self {
        self.quiz = Some(quiz);
        self
    }

    /// Positions of the elements that run the entrance animation, in document order.
    pub fn animated_positions(&self) -> Vec<usize> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, element)| element.animates())
            .map(|(index, _)| index)
            .collect()
    }
}

/// A navigation dot generated for one slide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dot {
    pub active: bool,
}

/// In-memory stand-in for the deck page.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub title: String,
    slides: Vec<Slide>,
    dots: Vec<Dot>,
    /// Width of `.progress-bar`, in percent.
    pub progress_width: f64,
    layout_flushes: u64,
}

impl Document {
    /// Build a document from slides. A deck needs at least one slide.
    pub fn new(title: impl Into<String>, slides: Vec<Slide>) -> Result<Self> {
        if slides.is_empty() {
            return Err(DeckError::StructureError(
                "deck has no .slide elements".to_string(),
            ));
        }
        Ok(Self {
            title: title.into(),
            slides,
            dots: Vec::new(),
            progress_width: 0.0,
            layout_flushes: 0,
        })
    }

    /// Load a deck from an HTML file on disk.
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading deck from {:?}", path);
        if !path.exists() {
            return Err(DeckError::PathNotFoundError(path.to_path_buf()));
        }
        let html = fs::read_to_string(path).map_err(DeckError::FileReadError)?;
        Self::parse_html(&html)
    }

    /// Parse deck HTML.
    ///
    /// The page must contain at least one `.slide`, a `.nav-dots` container
    /// and a `.progress-bar`. Script and style bodies are skipped, void
    /// elements need no closing tag, and an unclosed element is closed by
    /// its parent's end tag.
    pub fn parse_html(html: &str) -> Result<Self> {
        let mut parser = HtmlParser::default();
        parser.run(html)?;
        parser.finish()
    }

    /// The deck's slides. Never empty.
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    /// Slides can be edited in place but never added or removed.
    pub(crate) fn slides_mut(&mut self) -> &mut [Slide] {
        &mut self.slides
    }

    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    /// Replace the dot list with one inactive dot per slide.
    pub(crate) fn generate_dots(&mut self) {
        self.dots = vec![Dot::default(); self.slides.len()];
    }

    pub(crate) fn dots_mut(&mut self) -> &mut [Dot] {
        &mut self.dots
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.slides.get(id.slide)?.elements.get(id.index)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.slides.get_mut(id.slide)?.elements.get_mut(id.index)
    }

    /// Every reveal-eligible element across the whole deck.
    pub fn reveal_targets(&self) -> Vec<ElementId> {
        self.slides
            .iter()
            .enumerate()
            .flat_map(|(slide, s)| {
                s.elements
                    .iter()
                    .enumerate()
                    .filter(|(_, element)| element.reveals())
                    .map(move |(index, _)| ElementId { slide, index })
            })
            .collect()
    }

    /// Positions of the slides currently marked active.
    pub fn active_slides(&self) -> Vec<usize> {
        self.slides
            .iter()
            .enumerate()
            .filter(|(_, slide)| slide.active)
            .map(|(index, _)| index)
            .collect()
    }

    /// Positions of the dots currently marked active.
    pub fn active_dots(&self) -> Vec<usize> {
        self.dots
            .iter()
            .enumerate()
            .filter(|(_, dot)| dot.active)
            .map(|(index, _)| index)
            .collect()
    }

    /// Commit pending style writes, the equivalent of reading `offsetWidth`.
    pub fn flush_layout(&mut self) {
        self.layout_flushes += 1;
    }

    pub fn layout_flushes(&self) -> u64 {
        self.layout_flushes
    }
}

/// Where text inside an open tag should be collected.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Target {
    Element(usize),
    Option(usize),
    Feedback,
    Title,
    PageTitle,
}

#[derive(Debug)]
struct Frame {
    name: String,
    opens_slide: bool,
    targets: Vec<Target>,
}

#[derive(Debug, Default)]
struct SlideBuilder {
    id: Option<String>,
    heading: Option<String>,
    elements: Vec<Element>,
    options: Vec<QuizOption>,
    has_feedback: bool,
    is_quiz_slide: bool,
}

impl SlideBuilder {
    fn build(self, position: usize) -> Slide {
        let title = self
            .heading
            .filter(|heading| !heading.is_empty())
            .or_else(|| {
                self.elements
                    .iter()
                    .find(|element| element.tag == "h2" || element.tag == "h3")
                    .map(|element| element.text.clone())
            })
            .unwrap_or_else(|| format!("Slide {}", position + 1));

        let quiz = if self.options.is_empty() {
            if self.is_quiz_slide {
                warn!("Quiz slide {} has no .quiz-option elements", position + 1);
            }
            None
        } else {
            if !self.has_feedback {
                warn!("Quiz slide {} has no .quiz-feedback element", position + 1);
            }
            Some(Quiz::new(self.options))
        };

        Slide {
            id: self.id,
            title,
            active: false,
            elements: self.elements,
            quiz,
        }
    }
}

#[derive(Debug, Default)]
struct HtmlParser {
    stack: Vec<Frame>,
    page_title: String,
    current: Option<SlideBuilder>,
    slides: Vec<Slide>,
    has_nav_dots: bool,
    has_progress_bar: bool,
}

fn attribute(start: &BytesStart, key: &str) -> Option<String> {
    start
        .html_attributes()
        .flatten()
        .find(|attr| attr.key.as_ref().eq_ignore_ascii_case(key.as_bytes()))
        .map(|attr| match attr.unescape_value() {
            Ok(value) => value.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        })
}

/// Drop the bodies of `<script>` and `<style>` elements, which are raw text
/// and may contain `<` that would derail the tag reader.
fn strip_raw_text(html: &str) -> String {
    let lower = html.to_ascii_lowercase();
    let mut out = String::with_capacity(html.len());
    let mut cursor = 0;

    while cursor < html.len() {
        let next = ["<script", "<style"]
            .iter()
            .filter_map(|open| lower[cursor..].find(open).map(|at| (cursor + at, *open)))
            .min_by_key(|(at, _)| *at);

        let Some((at, open)) = next else {
            break;
        };
        let Some(tag_end) = lower[at..].find('>').map(|end| at + end + 1) else {
            break;
        };
        let close = format!("</{}", &open[1..]);
        let body_end = lower[tag_end..]
            .find(&close)
            .map(|end| tag_end + end)
            .unwrap_or(html.len());

        out.push_str(&html[cursor..tag_end]);
        cursor = body_end;
    }

    out.push_str(&html[cursor..]);
    out
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl HtmlParser {
    fn run(&mut self, html: &str) -> Result<()> {
        let html = strip_raw_text(html);
        let mut reader = Reader::from_str(&html);
        reader.check_end_names(false);
        reader.expand_empty_elements(false);

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    let name = String::from_utf8_lossy(start.name().as_ref()).to_ascii_lowercase();
                    let target = self.open(&name, &start);
                    if !VOID_TAGS.contains(&name.as_str()) {
                        let opens_slide = matches!(target, OpenKind::Slide);
                        self.stack.push(Frame {
                            name,
                            opens_slide,
                            targets: match target {
                                OpenKind::Collect(targets) => targets,
                                _ => Vec::new(),
                            },
                        });
                    }
                }
                Event::Empty(start) => {
                    let name = String::from_utf8_lossy(start.name().as_ref()).to_ascii_lowercase();
                    if let OpenKind::Slide = self.open(&name, &start) {
                        self.close_slide();
                    }
                }
                Event::End(end) => {
                    let name = String::from_utf8_lossy(end.name().as_ref()).to_ascii_lowercase();
                    self.close(&name);
                }
                Event::Text(text) => {
                    let text = match text.unescape() {
                        Ok(value) => value.into_owned(),
                        Err(_) => String::from_utf8_lossy(&text).into_owned(),
                    };
                    self.collect_text(&text);
                }
                Event::CData(data) => {
                    let text = String::from_utf8_lossy(&data).into_owned();
                    self.collect_text(&text);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        // Close anything left open at end of input
        while let Some(frame) = self.stack.pop() {
            if frame.opens_slide {
                self.close_slide();
            }
        }
        Ok(())
    }

    /// Register an opening tag and report what it starts.
    fn open(&mut self, name: &str, start: &BytesStart) -> OpenKind {
        let class_attr = attribute(start, "class").unwrap_or_default();
        let classes: Vec<&str> = class_attr.split_whitespace().collect();
        let has = |class: &str| classes.contains(&class);

        if name == "title" && self.current.is_none() {
            return OpenKind::Collect(vec![Target::PageTitle]);
        }
        if has("nav-dots") {
            self.has_nav_dots = true;
        }
        if has("progress-bar") {
            self.has_progress_bar = true;
        }

        if has("slide") && self.current.is_none() {
            debug!("Found slide {}", self.slides.len() + 1);
            self.current = Some(SlideBuilder {
                id: attribute(start, "id"),
                is_quiz_slide: has("quiz-slide"),
                ..SlideBuilder::default()
            });
            return OpenKind::Slide;
        }

        let Some(slide) = self.current.as_mut() else {
            return OpenKind::Plain;
        };

        if has("quiz-slide") {
            slide.is_quiz_slide = true;
        }

        let mut targets = Vec::new();

        if has("quiz-option") {
            // Only the exact attribute value `true` marks the right answer
            let correct = attribute(start, "data-correct").as_deref() == Some("true");
            slide.options.push(QuizOption::new(String::new(), correct));
            targets.push(Target::Option(slide.options.len() - 1));
        } else if has("quiz-feedback") {
            slide.has_feedback = true;
            targets.push(Target::Feedback);
        } else if name == "h1" && slide.heading.is_none() {
            slide.heading = Some(String::new());
            return OpenKind::Collect(vec![Target::Title]);
        }

        // Quiz parts still enter with the slide when their tag or class matches
        let element = Element::new(name, &classes);
        if element.animates() {
            slide.elements.push(element);
            targets.push(Target::Element(slide.elements.len() - 1));
        }

        if targets.is_empty() {
            OpenKind::Plain
        } else {
            OpenKind::Collect(targets)
        }
    }

    fn close(&mut self, name: &str) {
        // Ignore stray end tags that match nothing open
        if !self.stack.iter().any(|frame| frame.name == name) {
            return;
        }
        while let Some(frame) = self.stack.pop() {
            if frame.opens_slide {
                self.close_slide();
            }
            if frame.name == name {
                break;
            }
        }
    }

    fn close_slide(&mut self) {
        if let Some(builder) = self.current.take() {
            let position = self.slides.len();
            let mut slide = builder.build(position);
            for element in &mut slide.elements {
                element.text = normalize_whitespace(&element.text);
            }
            for option in slide.quiz.iter_mut().flat_map(|quiz| quiz.options.iter_mut()) {
                option.label = normalize_whitespace(&option.label);
            }
            self.slides.push(slide);
        }
    }

    fn collect_text(&mut self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        let targets: Vec<Target> = self
            .stack
            .iter()
            .flat_map(|frame| frame.targets.iter().copied())
            .collect();
        for target in targets {
            let buffer = match (target, self.current.as_mut()) {
                (Target::PageTitle, _) => &mut self.page_title,
                (Target::Element(index), Some(slide)) => &mut slide.elements[index].text,
                (Target::Option(index), Some(slide)) => &mut slide.options[index].label,
                (Target::Title, Some(slide)) => match slide.heading.as_mut() {
                    Some(heading) => heading,
                    None => continue,
                },
                // Feedback copy is generated, not read from the page
                (Target::Feedback, _) => continue,
                _ => continue,
            };
            if !buffer.is_empty() {
                buffer.push(' ');
            }
            buffer.push_str(text);
        }
    }

    fn finish(self) -> Result<Document> {
        if !self.has_nav_dots {
            return Err(DeckError::StructureError(
                "deck has no .nav-dots container".to_string(),
            ));
        }
        if !self.has_progress_bar {
            return Err(DeckError::StructureError(
                "deck has no .progress-bar element".to_string(),
            ));
        }

        let title = normalize_whitespace(&self.page_title);
        let mut slides = self.slides;
        for slide in &mut slides {
            slide.title = normalize_whitespace(&slide.title);
        }
        info!("Parsed deck {:?} with {} slides", title, slides.len());
        Document::new(title, slides)
    }
}

enum OpenKind {
    Slide,
    Collect(Vec<Target>),
    Plain,
}
