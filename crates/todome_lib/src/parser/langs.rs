//! Languages whose comments look like `// ...` and `/* ... */`, which are
//! the only comments todome understands.
use crate::{Result, UnknownLanguageSnafu};
use snafu::OptionExt;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SupportedLanguage {
    pub name: &'static str,
    /// File name suffixes, including the dot.
    pub file_extensions: Vec<&'static str>,
}

pub fn lang(name: &'static str, exts: Vec<&'static str>) -> SupportedLanguage {
    SupportedLanguage {
        name,
        file_extensions: exts,
    }
}

/// Java, Kotlin and Groovy. These are scanned when nothing else is configured.
pub fn jvm_langs() -> Vec<SupportedLanguage> {
    vec![
        lang("Java", vec![".java"]),
        lang("Kotlin", vec![".kt", ".kts"]),
        lang("Groovy", vec![".groovy"]),
    ]
}

pub fn all_supported_langs() -> Vec<SupportedLanguage> {
    let mut langs = jvm_langs();
    langs.extend(vec![
        lang("Actionscript", vec![".as"]),
        lang("Apex", vec![".cls", ".trigger"]),
        lang(
            "C",
            vec![".h", ".c", ".cpp", ".cxx", ".cc", ".hpp", ".hxx", ".hh", ".ino"],
        ),
        lang("C#", vec![".cs"]),
        lang("CSS", vec![".css"]),
        lang("D", vec![".d"]),
        lang("Dart", vec![".dart"]),
        lang("Go", vec![".go"]),
        lang("Haxe", vec![".hx"]),
        lang("JavaScript", vec![".js", ".es6", ".es", ".jsx", ".mjs", ".cjs"]),
        lang("Less", vec![".less"]),
        lang("Objective-C", vec![".m", ".mm"]),
        lang("PHP", vec![".php"]),
        lang("Protobuf", vec![".proto"]),
        lang("Reasonml", vec![".re"]),
        lang("Rust", vec![".rs"]),
        lang("Sbt", vec![".sbt"]),
        lang("Scala", vec![".sc", ".scala"]),
        lang("Scss", vec![".scss"]),
        lang("Swift", vec![".swift"]),
        lang("Typescript", vec![".ts", ".tsx"]),
        lang("Vue component", vec![".vue"]),
    ]);
    langs
}

/// The default extensions to scan.
pub fn default_extensions() -> Vec<String> {
    jvm_langs()
        .into_iter()
        .flat_map(|language| language.file_extensions)
        .map(String::from)
        .collect()
}

/// Look up a language by name, ignoring case.
pub fn find_language(name: &str) -> Result<SupportedLanguage> {
    all_supported_langs()
        .into_iter()
        .find(|language| language.name.eq_ignore_ascii_case(name))
        .context(UnknownLanguageSnafu { name })
}

/// Collect the extensions of the named languages, without duplicates.
///
/// ```rust
/// use todome_lib::parser::langs::*;
///
/// assert_eq!(
///     extensions_for_languages(&["kotlin", "RUST"]).unwrap(),
///     vec![".kt", ".kts", ".rs"]
/// );
/// assert!(extensions_for_languages(&["cobol"]).is_err());
/// ```
pub fn extensions_for_languages<S: AsRef<str>>(names: &[S]) -> Result<Vec<String>> {
    let mut extensions: Vec<String> = vec![];
    for name in names.iter() {
        for ext in find_language(name.as_ref())?.file_extensions.into_iter() {
            if !extensions.iter().any(|known| known == ext) {
                extensions.push(ext.to_string());
            }
        }
    }
    Ok(extensions)
}
