use super::theme::post_skin;
use blg_core::{Entry, TimestampFormat};
use regex::RegexBuilder;
use termimad::{
    MadSkin,
    crossterm::style::{Color, Stylize},
};

#[derive(Clone)]
pub struct RenderOptions {
    pub timestamp_format: TimestampFormat,
    pub use_color: bool,
    pub short_mode: bool,
}

pub struct Renderer {
    skin: MadSkin,
    opts: RenderOptions,
}

impl Renderer {
    pub fn new(config: Option<RenderOptions>) -> Self {
        Self {
            skin: post_skin(),
            opts: match config {
                Some(config) => config,
                None => RenderOptions {
                    timestamp_format: TimestampFormat::default(),
                    use_color: true,
                    short_mode: false,
                },
            },
        }
    }

    pub fn print_md(&self, md: &str) {
        self.skin.print_text(md);
    }

    pub fn print_info(&self, message: &str) {
        let md = format!("|-|\n| {message} |\n|-|\n");
        if self.opts.use_color {
            self.print_md(&md);
        } else {
            println!("{}", message);
        }
    }

    pub fn print_entry_line(&self, entry: &Entry) {
        println!("{}", self.entry_line(entry));
    }

    /// `1723716000000 15 สิงหาคม 2568 10:00 - Title [a - b]`
    pub fn entry_line(&self, entry: &Entry) -> String {
        let mut id = entry.id.to_string();
        let mut date = entry.formatted_update_timestamp(&self.opts.timestamp_format);
        let mut title = entry.title.trim().to_string();

        let tags = if entry.tags.is_empty() {
            String::new()
        } else if self.opts.use_color {
            let colored_tags = print_colored_list(&entry.tags);
            format!(" [{}]", colored_tags.join(" - "))
        } else {
            format!(" [{}]", entry.tags.join(" - "))
        };
        if self.opts.use_color {
            id = id.with(Color::DarkGrey).to_string();
            date = date.with(Color::Cyan).to_string();
            title = title.with(Color::Yellow).to_string();
        }
        format!("{id} {date} - {title}{tags}")
    }

    /// Markdown block for one post. Tags containing `highlight` get the
    /// matching part marked.
    pub fn entry_markdown(&self, entry: &Entry, highlight: Option<&str>) -> String {
        let date = entry.formatted_update_timestamp(&self.opts.timestamp_format);
        let mut md = format!(
            "## {}\n*Last updated: {date}* `#{}`\n",
            entry.title.trim(),
            entry.id
        );
        let content = entry.content.trim_end();
        if !content.is_empty() {
            md.push_str(content);
            md.push('\n');
        }
        if !entry.tags.is_empty() {
            let tags: Vec<String> = entry
                .tags
                .iter()
                .map(|t| match highlight {
                    Some(keyword) => highlight_keyword(t, keyword),
                    None => t.clone(),
                })
                .collect();
            md.push_str(&format!("Tags: {}\n", tags.join(", ")));
        }
        md
    }

    pub fn print_entries(&self, entries: &[&Entry], highlight: Option<&str>) {
        for (i, entry) in entries.iter().enumerate() {
            if self.opts.short_mode {
                self.print_entry_line(entry);
                continue;
            }
            let md = self.entry_markdown(entry, highlight);

            if self.opts.use_color {
                self.print_md(&md);
            } else {
                print!("{md}");
            }

            if i + 1 < entries.len() {
                println!();
            }

            if self.opts.use_color {
                self.print_md("---");
            } else {
                println!("---");
            }
        }
    }

    pub fn print_tags(&self, tags: &[String]) {
        let tags = if self.opts.use_color {
            print_colored_list(tags).join(" - ")
        } else {
            tags.join(" - ")
        };
        println!("{}", tags);
    }
}

/// Wraps every case-insensitive occurrence of `keyword` in backticks.
fn highlight_keyword(value: &str, keyword: &str) -> String {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return value.to_string();
    }
    match RegexBuilder::new(&regex::escape(keyword))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re.replace_all(value, "`$0`").to_string(),
        Err(_) => value.to_string(),
    }
}

pub fn print_colored_list(values: &[String]) -> Vec<String> {
    values.iter().map(|v| colorize_value(v)).collect()
}

fn colorize_value(val: &str) -> String {
    let palette = [
        Color::Red,
        Color::DarkRed,
        Color::Green,
        Color::DarkGreen,
        Color::Yellow,
        Color::DarkYellow,
        Color::Blue,
        Color::DarkBlue,
        Color::Magenta,
        Color::DarkMagenta,
        Color::Cyan,
        Color::DarkCyan,
        Color::Grey,
    ];

    // FNV-1a, so a tag keeps its color between runs
    fn stable_index(s: &str, modulo: usize) -> usize {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in s.as_bytes() {
            h ^= *b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        (h as usize) % modulo
    }

    let idx = stable_index(val, palette.len());
    format!("{}", val.with(palette[idx]))
}
