//! Embed builders for gate replies
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.2.0: Translated text moved to the description (4096 chars instead of 1024)
//! - 1.1.0: Lookup embeds for /wiki
//! - 1.0.0: Translation embed with cached/latency footer

use serenity::builder::CreateEmbed;

use crate::features::gate::{GateReply, Provenance};
use crate::features::wiki::LookupResult;

/// Discord embed description limit (characters)
pub const EMBED_DESCRIPTION_LIMIT: usize = 4096;
/// Discord embed field value limit (characters)
pub const EMBED_FIELD_LIMIT: usize = 1024;

const TRANSLATE_COLOR: u32 = 0x3498DB;
const WIKI_COLOR: u32 = 0xF8F9FA;

/// Footer text describing where a reply came from
pub fn provenance_footer(provenance: &Provenance) -> String {
    match provenance {
        Provenance::Cached => "⚡ Cached".to_string(),
        Provenance::Fresh { latency } => {
            format!("⚡ {:.2}ms", latency.as_secs_f64() * 1000.0)
        }
    }
}

/// Cut `text` to at most `max_chars` characters, ending with an ellipsis when cut
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{kept}…")
}

/// Translation reply embed.
///
/// The translated text goes in the description so a full-length request fits; the
/// original is only echoed back as a (possibly shortened) field.
pub fn translation_embed(original: &str, reply: &GateReply<String>) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed.title("🌐 Translation");
    embed.color(TRANSLATE_COLOR);
    embed.description(truncate_chars(&reply.value, EMBED_DESCRIPTION_LIMIT));
    embed.field("Original", truncate_chars(original, EMBED_FIELD_LIMIT), false);
    embed.field("Language", reply.request.lang.to_uppercase(), true);
    embed.footer(|f| f.text(provenance_footer(&reply.provenance)));
    embed
}

pub fn lookup_embed(reply: &GateReply<LookupResult>) -> CreateEmbed {
    let result = &reply.value;
    let mut embed = CreateEmbed::default();
    embed.title(&result.title);
    if !result.url.is_empty() {
        embed.url(&result.url);
    }
    embed.color(WIKI_COLOR);
    embed.description(truncate_chars(&result.summary, EMBED_DESCRIPTION_LIMIT));
    embed.footer(|f| f.text(provenance_footer(&reply.provenance)));
    embed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::gate::NormalizedRequest;
    use std::time::Duration;

    #[test]
    fn test_footer_text() {
        assert_eq!(provenance_footer(&Provenance::Cached), "⚡ Cached");
        let fresh = Provenance::Fresh {
            latency: Duration::from_micros(12_500),
        };
        assert_eq!(provenance_footer(&fresh), "⚡ 12.50ms");
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello world", 6), "hello…");
        let text = "日本語のテキスト";
        let cut = truncate_chars(text, 4);
        assert_eq!(cut.chars().count(), 4);
        assert!(cut.ends_with('…'));
    }

    fn embed_text<'a>(embed: &'a CreateEmbed, key: &str) -> Option<&'a str> {
        embed.0.get(key).and_then(|v| v.as_str())
    }

    #[test]
    fn test_full_length_translation_is_shown_whole() {
        let original = "a".repeat(4000);
        let translated = "b".repeat(4000);
        let reply = GateReply {
            value: translated.clone(),
            provenance: Provenance::Cached,
            request: NormalizedRequest {
                text: original.clone(),
                lang: "fr".to_string(),
            },
        };

        let embed = translation_embed(&original, &reply);
        assert_eq!(embed_text(&embed, "description"), Some(translated.as_str()));

        let fields = embed.0.get("fields").and_then(|v| v.as_array()).unwrap();
        let original_shown = fields[0].get("value").and_then(|v| v.as_str()).unwrap();
        assert_eq!(original_shown.chars().count(), EMBED_FIELD_LIMIT);
    }

    #[test]
    fn test_embeds_build() {
        let request = NormalizedRequest {
            text: "Hello".to_string(),
            lang: "fr".to_string(),
        };
        let translated = GateReply {
            value: "Bonjour".to_string(),
            provenance: Provenance::Cached,
            request: request.clone(),
        };
        let embed = translation_embed("Hello", &translated);
        assert_eq!(embed_text(&embed, "title"), Some("🌐 Translation"));
        assert_eq!(embed_text(&embed, "description"), Some("Bonjour"));

        let looked_up = GateReply {
            value: LookupResult {
                title: "Rust".to_string(),
                summary: "A language.".to_string(),
                url: "https://en.wikipedia.org/wiki/Rust".to_string(),
            },
            provenance: Provenance::Fresh {
                latency: Duration::from_millis(80),
            },
            request,
        };
        let embed = lookup_embed(&looked_up);
        assert_eq!(embed_text(&embed, "title"), Some("Rust"));
    }
}
