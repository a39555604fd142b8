use termimad::{
    Alignment, MadSkin,
    crossterm::style::{Attribute, Color},
};

// One Dark tones for the pieces a post block uses.
const TEXT: Color = Color::Rgb { r: 0xAB, g: 0xB2, b: 0xBF };
const MUTED: Color = Color::Rgb { r: 0x5C, g: 0x63, b: 0x70 };
const TITLE: Color = Color::Rgb { r: 0xE5, g: 0xC0, b: 0x7B };
const MATCH: Color = Color::Rgb { r: 0x98, g: 0xC3, b: 0x79 };
const MATCH_BG: Color = Color::Rgb { r: 0x28, g: 0x2C, b: 0x34 };
const FRAME: Color = Color::Rgb { r: 0xC6, g: 0x78, b: 0xDD };

/// Skin for post blocks: `## title`, an italic "last updated" line, content,
/// backticked search matches, `---` separators and boxed info messages.
pub fn post_skin() -> MadSkin {
    let mut skin = MadSkin::default();

    skin.paragraph.set_fg(TEXT);
    skin.italic.set_fg(MUTED);

    skin.headers[1].set_fg(TITLE);
    skin.headers[1].add_attr(Attribute::Bold);
    skin.headers[1].align = Alignment::Left;

    skin.inline_code.set_fg(MATCH);
    skin.inline_code.set_bg(MATCH_BG);

    skin.horizontal_rule.set_fg(MUTED);
    skin.table.set_fg(FRAME);

    skin
}
