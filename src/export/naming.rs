//! Export file naming
//!
//! Placeholders: `{datetime}` (local time, second resolution), `{tab}`,
//! `{index}` and `{counter}`. The counter is the smallest value that gives a
//! name not yet present in the export directory.

use chrono::NaiveDateTime;

use crate::state::gallery::Tab;

/// Timestamp format for `{datetime}`
pub const DATETIME_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Upper bound on the collision search
pub const MAX_COUNTER: u32 = 10_000;

/// Characters that are invalid in file names on at least one common platform
const INVALID_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*', '\n', '\r', '\t'];

/// Per-export values substituted into the template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameContext {
    pub datetime: String,
    pub tab: Tab,
    pub index: usize,
}

impl NameContext {
    pub fn new(at: NaiveDateTime, tab: Tab, index: usize) -> Self {
        Self {
            datetime: at.format(DATETIME_FORMAT).to_string(),
            tab,
            index,
        }
    }
}

/// A parsed `export_naming` value
#[derive(Debug, Clone, Copy)]
pub struct NamingTemplate<'a> {
    template: &'a str,
}

impl<'a> NamingTemplate<'a> {
    pub fn new(template: &'a str) -> Self {
        Self { template }
    }

    fn has_counter(&self) -> bool {
        self.template.contains("{counter}")
    }

    /// Resolve the template to a file stem (no extension)
    pub fn render(&self, ctx: &NameContext, counter: u32) -> String {
        let stem = self
            .template
            .replace("{datetime}", &ctx.datetime)
            .replace("{tab}", ctx.tab.as_str())
            .replace("{index}", &ctx.index.to_string())
            .replace("{counter}", &counter.to_string());

        sanitize_filename(&stem)
    }

    /// Candidate file names in the order they should be tried.
    ///
    /// With `{counter}` in the template the counter runs 0, 1, 2, ...
    /// Without it the plain name comes first, then `_1`, `_2`, ... is
    /// appended to the stem.
    pub fn candidates(self, ctx: &'a NameContext, extension: &'a str) -> impl Iterator<Item = String> + 'a {
        (0..=MAX_COUNTER).map(move |counter| {
            if self.has_counter() {
                format!("{}.{extension}", self.render(ctx, counter))
            } else if counter == 0 {
                format!("{}.{extension}", self.render(ctx, 0))
            } else {
                format!("{}_{counter}.{extension}", self.render(ctx, 0))
            }
        })
    }
}

/// Replace characters that can't appear in a file name with `_`
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if INVALID_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fixed_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_render_all_placeholders() {
        let ctx = NameContext::new(fixed_time(), Tab::Txt2Img, 0);
        let template = NamingTemplate::new("{datetime}_{tab}_{index}_{counter}");

        let first = template.candidates(&ctx, "png").next().unwrap();
        assert_eq!(first, "20240101_120000_txt2img_0_0.png");
    }

    #[test]
    fn test_counter_increments() {
        let ctx = NameContext::new(fixed_time(), Tab::Extras, 3);
        let names: Vec<_> = NamingTemplate::new("{datetime}_{index}_{counter}_painted")
            .candidates(&ctx, "jpg")
            .take(3)
            .collect();

        assert_eq!(
            names,
            [
                "20240101_120000_3_0_painted.jpg",
                "20240101_120000_3_1_painted.jpg",
                "20240101_120000_3_2_painted.jpg",
            ]
        );
    }

    #[test]
    fn test_template_without_counter_gets_suffix() {
        let ctx = NameContext::new(fixed_time(), Tab::Img2Img, 1);
        let names: Vec<_> = NamingTemplate::new("{tab}-{index}")
            .candidates(&ctx, "png")
            .take(3)
            .collect();

        assert_eq!(names, ["img2img-1.png", "img2img-1_1.png", "img2img-1_2.png"]);
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize_filename("a/b\\c:d*e?f"), "a_b_c_d_e_f");
        let ctx = NameContext::new(fixed_time(), Tab::Txt2Img, 0);
        assert_eq!(NamingTemplate::new("out/{tab}").render(&ctx, 0), "out_txt2img");
    }
}
