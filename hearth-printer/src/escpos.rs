//! ESC/POS ticket builder
//!
//! Content is accumulated as UTF-8 with inline ESC/POS commands and
//! converted to the printer's code page by [`TicketBuilder::build`].

use crate::encoding::CodePage;

const ESC: char = '\x1B';
const GS: char = '\x1D';

/// Paper widths in characters for the common roll sizes
pub const WIDTH_58MM: usize = 32;
pub const WIDTH_80MM: usize = 48;

/// Column layout for item rows: name, quantity, amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Columns {
    pub qty: usize,
    pub amount: usize,
}

impl Columns {
    pub fn for_width(width: usize) -> Self {
        if width >= WIDTH_80MM {
            Self { qty: 6, amount: 12 }
        } else {
            Self { qty: 4, amount: 9 }
        }
    }
}

pub struct TicketBuilder {
    buf: String,
    width: usize,
    code_page: CodePage,
}

impl TicketBuilder {
    /// New ticket that starts with `ESC @`
    pub fn new(width: usize, code_page: CodePage) -> Self {
        let mut buf = String::with_capacity(2048);
        buf.push(ESC);
        buf.push('@');
        Self {
            buf,
            width,
            code_page,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn code_page(&self) -> CodePage {
        self.code_page
    }

    fn cmd(&mut self, bytes: &[char]) -> &mut Self {
        self.buf.extend(bytes);
        self
    }

    // === Text ===

    pub fn text(&mut self, s: &str) -> &mut Self {
        self.buf.push_str(s);
        self
    }

    pub fn line(&mut self, s: &str) -> &mut Self {
        self.buf.push_str(s);
        self.buf.push('\n');
        self
    }

    pub fn newline(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    /// ESC d n
    pub fn feed(&mut self, lines: u8) -> &mut Self {
        self.cmd(&[ESC, 'd', char::from(lines.min(0x7F))])
    }

    // === Alignment ===

    pub fn center(&mut self) -> &mut Self {
        self.cmd(&[ESC, 'a', '\x01'])
    }

    pub fn left(&mut self) -> &mut Self {
        self.cmd(&[ESC, 'a', '\x00'])
    }

    pub fn right(&mut self) -> &mut Self {
        self.cmd(&[ESC, 'a', '\x02'])
    }

    // === Style ===

    pub fn bold(&mut self, on: bool) -> &mut Self {
        self.cmd(&[ESC, 'E', if on { '\x01' } else { '\x00' }])
    }

    pub fn double_size(&mut self) -> &mut Self {
        self.cmd(&[GS, '!', '\x11'])
    }

    pub fn double_height(&mut self) -> &mut Self {
        self.cmd(&[GS, '!', '\x01'])
    }

    pub fn normal_size(&mut self) -> &mut Self {
        self.cmd(&[GS, '!', '\x00'])
    }

    // === Layout ===

    pub fn sep_double(&mut self) -> &mut Self {
        let sep = "=".repeat(self.width);
        self.line(&sep)
    }

    pub fn sep_single(&mut self) -> &mut Self {
        let sep = "-".repeat(self.width);
        self.line(&sep)
    }

    /// Centered line, alignment restored to left afterwards
    pub fn title(&mut self, s: &str) -> &mut Self {
        self.center().line(s).left()
    }

    /// `left` flush left and `right` flush right on one line
    pub fn line_lr(&mut self, left: &str, right: &str) -> &mut Self {
        let lw = self.code_page.width(left);
        let rw = self.code_page.width(right);
        if lw + rw >= self.width {
            let joined = format!("{} {}", left, right);
            return self.line(&joined);
        }
        let gap = " ".repeat(self.width - lw - rw);
        let row = format!("{}{}{}", left, gap, right);
        self.line(&row)
    }

    /// Item row: name left, quantity and amount right-aligned in fixed columns
    ///
    /// Names longer than the name column wrap onto following lines.
    pub fn item_row(&mut self, name: &str, qty: &str, amount: &str, cols: Columns) -> &mut Self {
        let name_width = self.width.saturating_sub(cols.qty + cols.amount).max(1);
        let cp = self.code_page;

        let first = name_chunk(cp, name, name_width);
        let mut rest = &name[first.len()..];

        // a single char wider than the column still prints, overflowing it
        let name_cell = if cp.width(&first) >= name_width {
            first
        } else {
            cp.pad(&first, name_width, false)
        };
        let row = format!(
            "{}{}{}",
            name_cell,
            cp.pad(qty, cols.qty, true),
            cp.pad(amount, cols.amount, true)
        );
        self.line(&row);

        while !rest.is_empty() {
            let chunk = name_chunk(cp, rest, name_width);
            rest = &rest[chunk.len()..];
            self.line(&chunk);
        }
        self
    }

    // === Paper ===

    /// GS V 66 n: feed then full cut
    pub fn cut(&mut self, feed: u8) -> &mut Self {
        // arguments stay ASCII so the code page pass leaves them alone
        self.cmd(&[GS, 'V', 'B', char::from(feed.min(0x7F))])
    }

    /// ESC p 0: kick the cash drawer on pin 2
    pub fn open_drawer(&mut self) -> &mut Self {
        self.cmd(&[ESC, 'p', '\x00', '\x19', '\x7D'])
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Encoded bytes ready for the printer
    pub fn build(&self) -> Vec<u8> {
        self.code_page.encode(self.buf.as_bytes())
    }
}

/// Next piece of `s` fitting in `width` cells, never empty for non-empty `s`
fn name_chunk(cp: CodePage, s: &str, width: usize) -> String {
    let chunk = cp.truncate(s, width);
    if chunk.is_empty() {
        s.chars().next().map(String::from).unwrap_or_default()
    } else {
        chunk
    }
}
