use blg_core::EntryId;
use clap::{ArgGroup, Parser};

use super::style::{ColorMode, Style};

/// blg — Small tagged notes, kept in one JSON file
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    group(ArgGroup::new("read_mode").args(["search", "tag", "show"]).conflicts_with_all(["text"])),
    group(ArgGroup::new("edit_mode").args(["edit"])),
    group(ArgGroup::new("delete_mode").args(["delete"]).conflicts_with_all(["read_mode", "edit_mode", "text"])),
    group(ArgGroup::new("solo").args(["path", "all_tags"]).conflicts_with_all(["read_mode", "edit_mode", "delete_mode", "text"])),
)]
pub struct BaseCli {
    /// Prints the file the posts are saved to
    #[arg(long, short)]
    pub path: bool,
    /// Prints all the tags within all posts.
    #[arg(long)]
    pub all_tags: bool,
    /// Control ANSI colors in output.
    /// By default, colors are disabled when output is redirected (e.g with `>` or `|`).
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,
    /// Prints the count of found posts/tags.
    #[arg(long)]
    pub count: bool,
    /// Output style: "long" or "short". Short style only shows id, date, title and tags.
    #[arg(long, short, value_enum, env = "BLG_STYLE", default_value_t = Style::Long)]
    pub style: Style,

    /// Shows posts with a tag containing KEYWORD, ignoring case (e.g., `blg --search rust`)
    #[arg(long, short = 'S')]
    pub search: Option<String>,
    /// Shows posts tagged TAG, like clicking on the tag (e.g., `blg --tag Rust`)
    #[arg(long)]
    pub tag: Option<String>,
    /// With `--tag`, only match the tag exactly (case sensitive).
    #[arg(long, requires = "tag")]
    pub exact: bool,
    /// Shows a single post.
    #[arg(long, value_name = "ID")]
    pub show: Option<EntryId>,

    /// Edits the post with this id. Title words, `--content` and `--tags` replace
    /// the current values; without any of them your $EDITOR opens on the content.
    #[arg(long, short, value_name = "ID")]
    pub edit: Option<EntryId>,
    /// Deletes the post with this id, after asking.
    #[arg(long, short, value_name = "ID")]
    pub delete: Option<EntryId>,
    /// Skips the delete confirmation.
    #[arg(long, short, requires = "delete")]
    pub yes: bool,

    /// Post content. When writing without it, your $EDITOR opens for the content.
    #[arg(long, short)]
    pub content: Option<String>,
    /// Comma separated tags (e.g., `-t "rust, notes"`).
    #[arg(long, short)]
    pub tags: Option<String>,
    /// Title of a new post (e.g., `blg Morning walk -c "Cold but sunny"`).
    #[arg()]
    pub text: Vec<String>,
}

pub struct CliOptions {
    pub use_color: bool,
    pub short_mode: bool,
}

impl BaseCli {
    pub fn new() -> Self {
        BaseCli::parse()
    }

    pub fn load(&self) -> CliOptions {
        CliOptions {
            use_color: self.color.use_color(),
            short_mode: self.style == Style::Short,
        }
    }

    /// Title words joined, or `None` when no words were given.
    pub fn title(&self) -> Option<String> {
        if self.text.is_empty() {
            None
        } else {
            Some(self.text.join(" "))
        }
    }
}
