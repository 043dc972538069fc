mod arg;
pub mod handler;
pub use arg::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OptionKind {
    ListLanguages,
    ListCompilers,
    ListStandards,
    Compiler,
    Std,
    Standard,
}

/// Labels ending in `=` take a value; the others are bare flags.
macro_rules! arg_parser {
    ($(($label:literal, $enum:expr)),+) => {
        CommandMatcher::new(&[$($label),+], &[$($enum),+])
    };
}

pub fn init_parser() -> CommandMatcher<OptionKind> {
    arg_parser!(
        ("list-languages", OptionKind::ListLanguages),
        ("list-compilers=", OptionKind::ListCompilers),
        ("list-standards=", OptionKind::ListStandards),
        ("compiler=", OptionKind::Compiler),
        ("std=", OptionKind::Std),
        ("standard=", OptionKind::Standard)
    )
}
