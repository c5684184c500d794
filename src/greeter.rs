//! Small greeting command shipped alongside the game binary

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Language {
    #[default]
    En,
    Es,
    Fr,
    Pt,
}

impl Language {
    pub fn greeting(&self) -> &'static str {
        match self {
            Language::En => "Hello",
            Language::Es => "Hola",
            Language::Fr => "Bonjour",
            Language::Pt => "Olá",
        }
    }
}

#[derive(Debug, Clone)]
pub struct GreetOptions {
    pub name: String,
    pub language: Language,
    pub uppercase: bool,
}

impl Default for GreetOptions {
    fn default() -> Self {
        Self {
            name: "World".to_string(),
            language: Language::En,
            uppercase: false,
        }
    }
}

pub fn greet(options: &GreetOptions) -> String {
    let message = format!("{}, {}!", options.language.greeting(), options.name);
    if options.uppercase {
        message.to_uppercase()
    } else {
        message
    }
}

/// Banner printed before the greeting
pub fn banner() -> String {
    let cwd = std::env::current_dir()
        .map(|dir| dir.display().to_string())
        .unwrap_or_else(|_| "<unknown>".to_string());
    [
        "Space Snake".to_string(),
        "=====================================".to_string(),
        format!("Version: {}", env!("CARGO_PKG_VERSION")),
        format!("Working Directory: {}", cwd),
        "=====================================".to_string(),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_greeting() {
        assert_eq!(greet(&GreetOptions::default()), "Hello, World!");
    }

    #[test]
    fn test_languages() {
        let mut options = GreetOptions {
            name: "Alice".to_string(),
            ..Default::default()
        };

        options.language = Language::Fr;
        assert_eq!(greet(&options), "Bonjour, Alice!");

        options.language = Language::Pt;
        assert_eq!(greet(&options), "Olá, Alice!");

        options.language = Language::Es;
        options.uppercase = true;
        assert_eq!(greet(&options), "HOLA, ALICE!");
    }

    #[test]
    fn test_banner_mentions_version() {
        assert!(banner().contains(env!("CARGO_PKG_VERSION")));
    }
}
