pub struct Language {
    pub compiler: &'static str,
    pub standard: &'static str,
}

/// Defaults keyed by file name suffix; the first match wins.
pub const LANGUAGES: &[(&str, Language)] = &[(
    ".c",
    Language {
        compiler: "gcc-head-c",
        standard: "c11",
    },
)];

/// Used for `.cpp`, `.cc`, extensionless and every other file name.
pub static FALLBACK: Language = Language {
    compiler: "gcc-head",
    standard: "c++17",
};

#[derive(Debug, PartialEq)]
pub struct Resolved {
    pub compiler: String,
    pub standard: String,
}

pub fn defaults_for(filename: &str) -> &'static Language {
    LANGUAGES
        .iter()
        .find(|(suffix, _)| filename.ends_with(*suffix))
        .map_or(&FALLBACK, |(_, lang)| lang)
}

/// Explicit choices always win; nothing is checked against the catalog.
pub fn resolve(filename: &str, compiler: Option<&str>, standard: Option<&str>) -> Resolved {
    let lang = defaults_for(filename);
    Resolved {
        compiler: compiler.unwrap_or(lang.compiler).to_string(),
        standard: standard.unwrap_or(lang.standard).to_string(),
    }
}
