//! Per-language prompt fragments sent to generative providers.

use parley_intent::Language;

/// Short instruction prepended to the hosted inference input.
pub fn hosted_instruction(language: Language) -> &'static str {
    match language {
        Language::English => "Respond in English. ",
        Language::Spanish => "Responde en español. ",
        Language::French => "Réponds en français. ",
        Language::German => "Antworte auf Deutsch. ",
        Language::Portuguese => "Responde em português. ",
        Language::Italian => "Rispondi in italiano. ",
    }
}

/// System prompt for the local daemon.
pub fn daemon_system_prompt(language: Language) -> &'static str {
    match language {
        Language::English => {
            "You are a helpful AI assistant that responds in English. Be concise but complete."
        }
        Language::Spanish => {
            "Eres un asistente IA útil que responde en español. Sé conciso pero completo."
        }
        Language::French => {
            "Tu es un assistant IA utile qui répond en français. Sois concis mais complet."
        }
        Language::German => {
            "Du bist ein nützlicher KI-Assistent, der auf Deutsch antwortet. Sei prägnant aber vollständig."
        }
        Language::Portuguese => {
            "Você é um assistente de IA útil que responde em português. Seja conciso mas completo."
        }
        Language::Italian => {
            "Sei un assistente IA utile che risponde in italiano. Sii conciso ma completo."
        }
    }
}

/// Full daemon prompt: system line, blank line, then a one-turn transcript.
pub fn daemon_prompt(language: Language, message: &str) -> String {
    format!(
        "{}\n\nUser: {message}\nAssistant:",
        daemon_system_prompt(language)
    )
}

/// Lead-in for answers found by the web lookup.
pub fn web_intro(language: Language) -> &'static str {
    match language {
        Language::English => "According to my web search",
        Language::Spanish => "Según mi búsqueda en la web",
        Language::French => "Selon ma recherche sur le web",
        Language::German => "Laut meiner Websuche",
        Language::Portuguese => "Segundo minha busca na web",
        Language::Italian => "Secondo la mia ricerca sul web",
    }
}
