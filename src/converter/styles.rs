//! Style resolver - handles style inheritance and property merging.

use rs_docx::formatting::{CharacterProperty, ParagraphProperty};
use rs_docx::styles::Style;
use std::collections::HashMap;

/// Resolver for DOCX styles and inheritance.
pub struct StyleResolver<'a> {
    styles: &'a rs_docx::styles::Styles<'a>,
    style_map: HashMap<&'a str, &'a Style<'a>>,
}

impl<'a> StyleResolver<'a> {
    pub fn new(styles: &'a rs_docx::styles::Styles<'a>) -> Self {
        let mut style_map = HashMap::new();
        for style in &styles.styles {
            style_map.insert(style.style_id.as_ref(), style);
        }
        Self { styles, style_map }
    }

    /// Display name of a style (`w:name`), falling back to nothing for unknown ids.
    pub fn style_name(&self, style_id: &str) -> Option<&'a str> {
        self.style_map
            .get(style_id)
            .and_then(|style| style.name.as_ref())
            .map(|name| name.value.as_ref())
    }

    /// Resolves the effective character properties for a run.
    ///
    /// Hierarchy (highest priority first):
    /// 1. Direct formatting on the run (rPr)
    /// 2. Character style applied to the run (rStyle) and its ancestors
    /// 3. Paragraph style applied to the paragraph (pStyle) and its ancestors
    /// 4. Document defaults (docDefaults)
    pub fn resolve_run_property(
        &self,
        direct_props: Option<&CharacterProperty<'a>>,
        run_style_id: Option<&str>,
        para_style_id: Option<&str>,
    ) -> CharacterProperty<'a> {
        let mut merged = CharacterProperty::default();

        if let Some(defaults) = &self.styles.default {
            if let Some(r_pr) = &defaults.character.inner {
                merged = merge_char_props(merged, r_pr);
            }
        }

        if let Some(pid) = para_style_id {
            self.apply_style_chain_char(&mut merged, pid);
        }

        if let Some(rid) = run_style_id {
            self.apply_style_chain_char(&mut merged, rid);
        }

        if let Some(direct) = direct_props {
            merged = merge_char_props(merged, direct);
        }

        merged
    }

    /// Resolves the effective paragraph properties.
    pub fn resolve_paragraph_property(
        &self,
        direct_props: Option<&ParagraphProperty<'a>>,
        para_style_id: Option<&str>,
    ) -> ParagraphProperty<'a> {
        let mut merged = ParagraphProperty::default();

        if let Some(defaults) = &self.styles.default {
            if let Some(p_pr) = &defaults.paragraph.inner {
                merged = merge_para_props(merged, p_pr);
            }
        }

        if let Some(pid) = para_style_id {
            self.apply_style_chain_para(&mut merged, pid);
        }

        if let Some(direct) = direct_props {
            merged = merge_para_props(merged, direct);
        }

        merged
    }

    /// Style chain from the given style up to its root, leaf first.
    fn style_chain(&self, style_id: &str) -> Vec<&'a Style<'a>> {
        let mut chain: Vec<&'a Style<'a>> = Vec::new();
        let mut current_id = Some(style_id);

        while let Some(id) = current_id {
            let Some(style) = self.style_map.get(id).copied() else {
                break;
            };
            // basedOn cycles exist in the wild
            if chain.iter().any(|seen| std::ptr::eq(*seen, style)) {
                break;
            }
            chain.push(style);
            current_id = style.base.as_ref().map(|b| b.value.as_ref());
        }

        chain
    }

    fn apply_style_chain_char(&self, target: &mut CharacterProperty<'a>, style_id: &str) {
        // root first so derived styles override their base
        for style in self.style_chain(style_id).into_iter().rev() {
            if let Some(r_pr) = &style.character {
                *target = merge_char_props(target.clone(), r_pr);
            }
        }
    }

    fn apply_style_chain_para(&self, target: &mut ParagraphProperty<'a>, style_id: &str) {
        for style in self.style_chain(style_id).into_iter().rev() {
            if let Some(p_pr) = &style.paragraph {
                *target = merge_para_props(target.clone(), p_pr);
            }
        }
    }
}

/// Heading level for built-in heading style names (`Heading 1`, `heading2`, `Title`).
pub fn parse_heading_style(style: &str) -> Option<usize> {
    let style_lower = style.to_lowercase();
    if let Some(rest) = style_lower.strip_prefix("heading") {
        return rest.trim().parse().ok().filter(|level| (1..=6).contains(level));
    }
    match style_lower.as_str() {
        "title" => Some(1),
        "subtitle" => Some(2),
        _ => None,
    }
}

// Returns a new property set where `overlay` overrides `base`.
fn merge_char_props<'a>(
    base: CharacterProperty<'a>,
    overlay: &CharacterProperty<'a>,
) -> CharacterProperty<'a> {
    let mut new = base;

    if overlay.bold.is_some() {
        new.bold = overlay.bold.clone();
    }
    if overlay.italics.is_some() {
        new.italics = overlay.italics.clone();
    }
    if overlay.strike.is_some() {
        new.strike = overlay.strike.clone();
    }
    if overlay.underline.is_some() {
        new.underline = overlay.underline.clone();
    }

    new
}

fn merge_para_props<'a>(
    base: ParagraphProperty<'a>,
    overlay: &ParagraphProperty<'a>,
) -> ParagraphProperty<'a> {
    let mut new = base;

    if overlay.numbering.is_some() {
        new.numbering = overlay.numbering.clone();
    }
    if overlay.style_id.is_some() {
        new.style_id = overlay.style_id.clone();
    }

    new
}
