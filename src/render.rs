// ABOUTME: Text rendering module for the big-deck application
// ABOUTME: Formats deck structure and live navigator state for the terminal

use crate::document::Document;
use crate::navigator::Navigator;
use std::fmt::Write;

/// One-line status: position, dots, progress, hash and transient state.
pub fn render_status(navigator: &Navigator) -> String {
    let document = navigator.document();
    let dots: String = document
        .dots()
        .iter()
        .map(|dot| if dot.active { '●' } else { '○' })
        .collect();

    let mut line = format!(
        "slide {}/{} {} {:.0}% #{}",
        navigator.current_slide() + 1,
        navigator.slide_count(),
        dots,
        document.progress_width,
        navigator.location().hash().unwrap_or("")
    );

    if navigator.is_scroll_locked() {
        line.push_str(" [scroll-locked]");
    }

    let Some(slide) = document.slide(navigator.current_slide()) else {
        return line;
    };
    let hidden = slide
        .elements
        .iter()
        .filter(|element| element.animates() && element.style.is_hidden())
        .count();
    if hidden > 0 {
        let _ = write!(line, " [{} entering]", hidden);
    }

    if let Some(quiz) = &slide.quiz {
        if quiz.feedback.visible {
            let _ = write!(line, " [{}]", quiz.feedback.class_name());
        }
    }

    line
}

/// Multi-line summary of a deck's structure.
pub fn render_outline(document: &Document) -> String {
    let mut out = String::new();
    let title = if document.title.is_empty() {
        "(untitled deck)"
    } else {
        document.title.as_str()
    };
    let _ = writeln!(out, "{} - {} slides", title, document.len());

    for (index, slide) in document.slides().iter().enumerate() {
        let animated = slide.animated_positions().len();
        let revealing = slide.elements.iter().filter(|e| e.reveals()).count();
        let _ = write!(
            out,
            "{:>3}. {} ({} animated, {} reveal)",
            index + 1,
            slide.title,
            animated,
            revealing
        );
        if let Some(id) = &slide.id {
            let _ = write!(out, " #{}", id);
        }
        out.push('\n');

        if let Some(quiz) = &slide.quiz {
            for (position, option) in quiz.options.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "       [{}] {}{}",
                    position,
                    option.label,
                    if option.correct { " (correct)" } else { "" }
                );
            }
        }
    }

    out
}
