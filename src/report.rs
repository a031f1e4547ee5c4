use vpath::{Level, MatchContext};

mod ansi {
    const RESET: &str = "\x1b[0m";

    /// What a piece of the report shows; each role has one fixed SGR style.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Role {
        Title,
        Section,
        Spec,
        Field,
        Level,
        Active,
        Warning,
        Value,
        Muted,
    }

    impl Role {
        fn sgr(self) -> &'static str {
            match self {
                Role::Title => "\x1b[1;36m",
                Role::Section => "\x1b[90m",
                Role::Spec | Role::Field => "\x1b[34m",
                Role::Level => "\x1b[36m",
                Role::Active => "\x1b[32m",
                Role::Warning => "\x1b[33m",
                Role::Value => "\x1b[1m",
                Role::Muted => "\x1b[2m",
            }
        }
    }

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, text: impl AsRef<str>, role: Role) -> String {
            let text = text.as_ref();
            if self.enabled { format!("{}{text}{RESET}", role.sgr()) } else { text.to_string() }
        }
    }
}

use ansi::Role;

/// Print the state of a match: where the walk stopped, what it bound and the
/// filter handed to the backend.
pub fn print_context(path: &str, ctx: &MatchContext, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.paint(format!("⚙  Resolving: \"{path}\""), Role::Title));

    section(&palette, "Rule");
    println!("  {}", palette.paint(ctx.rule().spec(), Role::Spec));
    for (idx, level) in ctx.rule().levels().iter().enumerate() {
        let marker = match ctx.position() {
            Some(pos) if pos == idx => palette.paint("▶", Role::Active),
            Some(pos) if idx < pos => palette.paint("✓", Role::Muted),
            _ => palette.paint("·", Role::Muted),
        };
        println!("  {marker} {} {}", palette.paint(format!("[{idx}]"), Role::Section), fmt_level(level, &palette));
    }

    section(&palette, "Bindings");
    if ctx.values().is_empty() {
        println!("{}", palette.paint("  No values bound", Role::Muted));
    }
    for (field, value) in ctx.values() {
        println!(
            "  {} {} {}",
            palette.paint(field, Role::Field),
            palette.paint("=", Role::Muted),
            palette.paint(value, Role::Value)
        );
    }
    if let Some(token) = ctx.pending() {
        println!("  {} {}", palette.paint("multimatch:", Role::Warning), palette.paint(token, Role::Value));
    }

    section(&palette, "Walk");
    println!(
        "  current: {}  │  next: {}  │  full: {}",
        ctx.current().map_or_else(|| palette.paint("-", Role::Muted), |l| fmt_level(l, &palette)),
        fmt_level(ctx.next(), &palette),
        if ctx.is_full() { palette.paint("yes", Role::Active) } else { palette.paint("no", Role::Muted) },
    );
    println!("  browse:  {}", fmt_level(ctx.browse_level(), &palette));
    println!("  fields:  {}", palette.paint(ctx.all_fields().join(", "), Role::Muted));
    match ctx.filter() {
        Ok(filter) => println!("  filter:  {}", palette.paint(filter.to_string(), Role::Active)),
        Err(err) => println!("  filter:  {}", palette.paint(err.to_string(), Role::Warning)),
    }
    println!();
}

fn section(palette: &ansi::Palette, title: &str) {
    println!("\n{}", palette.paint(format!("━━━ {title} ━━━"), Role::Section));
}

fn fmt_level(level: &Level, palette: &ansi::Palette) -> String {
    palette.paint(level.format(), Role::Level)
}
