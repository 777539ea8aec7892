//! Numbering resolver - maps numbered paragraphs to list kinds and depths.

use rs_docx::Docx;
use std::collections::HashMap;

/// Resolver for DOCX numbering definitions.
pub struct NumberingResolver {
    /// Maps numId -> abstractNumId
    num_instances: HashMap<i32, i32>,
    /// Maps abstractNumId -> level definitions
    abstract_nums: HashMap<i32, Vec<LevelDef>>,
    /// Maps abstractNumId -> shallowest defined level, used to normalize depth
    level_shifts: HashMap<i32, i32>,
}

#[derive(Clone, Debug)]
struct LevelDef {
    ilvl: i32,
    num_fmt: String,
}

impl NumberingResolver {
    /// Creates a new numbering resolver from a parsed DOCX.
    pub fn new(docx: &Docx) -> Self {
        let mut num_instances = HashMap::new();
        let mut abstract_nums = HashMap::new();
        let mut level_shifts = HashMap::new();

        if let Some(numbering) = &docx.numbering {
            for abs_num in &numbering.abstract_numberings {
                let abs_id = abs_num.abstract_num_id.map(|id| id as i32).unwrap_or(0);
                let mut levels = Vec::new();

                for lvl in &abs_num.levels {
                    let ilvl = lvl.i_level.map(|i| i as i32).unwrap_or(0);
                    let num_fmt = lvl
                        .number_format
                        .as_ref()
                        .map(|f| f.value.to_string())
                        .unwrap_or_else(|| "decimal".to_string());
                    levels.push(LevelDef { ilvl, num_fmt });
                }

                levels.sort_by_key(|l| l.ilvl);
                if let Some(first) = levels.first() {
                    level_shifts.insert(abs_id, first.ilvl);
                }
                abstract_nums.insert(abs_id, levels);
            }

            for num in &numbering.numberings {
                if let (Some(num_id), Some(abs_ref)) = (num.num_id, &num.abstract_num_id) {
                    if let Some(abs_id) = abs_ref.value {
                        num_instances.insert(num_id as i32, abs_id as i32);
                    }
                }
            }
        }

        Self {
            num_instances,
            abstract_nums,
            level_shifts,
        }
    }

    /// Nesting depth of a list item, relative to the shallowest level its list defines.
    pub fn get_indent(&self, num_id: i32, ilvl: i32) -> usize {
        let mut indent = ilvl;
        if let Some(&abs_id) = self.num_instances.get(&num_id) {
            if let Some(&base_level) = self.level_shifts.get(&abs_id) {
                indent = indent.saturating_sub(base_level);
            }
        }
        indent.max(0) as usize
    }

    /// Whether the level renders as `<ol>`; bullets and unknown lists render as `<ul>`.
    pub fn is_ordered(&self, num_id: i32, ilvl: i32) -> bool {
        let Some(levels) = self
            .num_instances
            .get(&num_id)
            .and_then(|abs_id| self.abstract_nums.get(abs_id))
        else {
            return false;
        };

        let level = levels
            .iter()
            .find(|l| l.ilvl == ilvl)
            .or_else(|| levels.first());

        match level {
            Some(level) => !matches!(level.num_fmt.as_str(), "bullet" | "none"),
            None => false,
        }
    }
}
