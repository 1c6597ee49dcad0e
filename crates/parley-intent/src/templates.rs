//! Canned response templates, per language and intent.
//!
//! A [`Template`] is either a fixed string, a pool of variants picked
//! uniformly through an injected [`Picker`], or an echo template that embeds
//! a character-truncated prefix of the user's message followed by `...`.
//!
//! English covers every [`Intent`].  The other languages translate greeting,
//! help, question, technology, thanks and goodbye; every other intent renders
//! that language's own fallback echo template.

use std::sync::Arc;

use rand::Rng;

use crate::classifier::Intent;
use crate::language::Language;

/// Placeholder replaced by the truncated user message in echo templates.
const INPUT_PLACEHOLDER: &str = "{input}";

/// Prefix length embedded by question templates.
pub const QUESTION_ECHO_CHARS: usize = 50;

/// Prefix length embedded by fallback templates.
pub const FALLBACK_ECHO_CHARS: usize = 30;

/// English statements shorter than this many words ask for more detail.
const SHORT_STATEMENT_WORDS: usize = 3;

/// English statements longer than this many words are acknowledged as
/// detailed.
const LONG_STATEMENT_WORDS: usize = 20;

// ---------------------------------------------------------------------------
// Randomness
// ---------------------------------------------------------------------------

/// Source of indices for pool templates.
pub trait Picker: Send + Sync {
    /// Return an index in `0..len`.  `len` is never zero.
    fn pick(&self, len: usize) -> usize;
}

/// Picker backed by the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngPicker;

impl Picker for ThreadRngPicker {
    fn pick(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Picker that always returns the same index (clamped to the pool size).
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPicker(pub usize);

impl Picker for FixedPicker {
    fn pick(&self, len: usize) -> usize {
        self.0.min(len - 1)
    }
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// One response template.
#[derive(Debug, Clone, Copy)]
pub enum Template {
    Fixed(&'static str),
    Pool(&'static [&'static str]),
    Echo {
        template: &'static str,
        prefix_chars: usize,
    },
}

impl Template {
    /// Produce the response text for `input`.
    pub fn render(&self, input: &str, picker: &dyn Picker) -> String {
        match *self {
            Template::Fixed(text) => text.to_owned(),
            Template::Pool(pool) => pool[picker.pick(pool.len())].to_owned(),
            Template::Echo {
                template,
                prefix_chars,
            } => template.replacen(
                INPUT_PLACEHOLDER,
                &format!("{}...", truncate_chars(input, prefix_chars)),
                1,
            ),
        }
    }
}

/// Return at most the first `max` characters of `text`.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Translated templates for one language.  `None` falls back to
/// [`LanguagePack::fallback`].
struct LanguagePack {
    greeting: Template,
    help: Template,
    question: Template,
    technology: Template,
    thanks: Template,
    goodbye: Template,
    business: Option<Template>,
    learning: Option<Template>,
    advice: Option<Template>,
    fallback: Template,
}

impl LanguagePack {
    fn template_for(&self, intent: Intent) -> Template {
        match intent {
            Intent::Greeting => self.greeting,
            Intent::Help => self.help,
            Intent::Question => self.question,
            Intent::Technology => self.technology,
            Intent::Thanks => self.thanks,
            Intent::Goodbye => self.goodbye,
            Intent::Business => self.business.unwrap_or(self.fallback),
            Intent::Learning => self.learning.unwrap_or(self.fallback),
            Intent::Advice => self.advice.unwrap_or(self.fallback),
            Intent::Statement => self.fallback,
        }
    }
}

/// Rule-based response store.
#[derive(Clone)]
pub struct TemplateStore {
    picker: Arc<dyn Picker>,
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::new(Arc::new(ThreadRngPicker))
    }
}

impl TemplateStore {
    /// Create a store that draws pool entries through `picker`.
    pub fn new(picker: Arc<dyn Picker>) -> Self {
        Self { picker }
    }

    /// Render the canned response for `(language, intent)`.
    pub fn render(&self, language: Language, intent: Intent, original: &str) -> String {
        if language == Language::English && intent == Intent::Statement {
            return self.render_english_statement(original);
        }
        pack(language)
            .template_for(intent)
            .render(original, self.picker.as_ref())
    }

    fn render_english_statement(&self, original: &str) -> String {
        let words = original.split_whitespace().count();
        let template = if words < SHORT_STATEMENT_WORDS {
            EN_NEED_DETAIL
        } else if words > LONG_STATEMENT_WORDS {
            EN_COMPLEX
        } else {
            EN.fallback
        };
        template.render(original, self.picker.as_ref())
    }
}

fn pack(language: Language) -> &'static LanguagePack {
    match language {
        Language::English => &EN,
        Language::Spanish => &ES,
        Language::French => &FR,
        Language::German => &DE,
        Language::Portuguese => &PT,
        Language::Italian => &IT,
    }
}

// ---------------------------------------------------------------------------
// English
// ---------------------------------------------------------------------------

const EN_NEED_DETAIL: Template = Template::Fixed(
    "Could you tell me a bit more about that? I'd love to help but need a little more \
     information to give you the best response.",
);

const EN_COMPLEX: Template = Template::Fixed(
    "That's quite detailed! Let me process what you've shared. In a full implementation, I \
     would provide a comprehensive response addressing all the points you've mentioned. For \
     now, could you help me understand what specific aspect is most important to you?",
);

static EN: LanguagePack = LanguagePack {
    greeting: Template::Pool(&[
        "Hello! How can I assist you today?",
        "Hi there! What can I help you with?",
        "Greetings! I'm here to help. What's on your mind?",
        "Hello! Feel free to ask me anything.",
    ]),
    help: Template::Fixed(
        "I can help you with various tasks including:
• Answering questions on different topics
• Providing explanations and definitions
• Helping with problem-solving
• Offering suggestions and recommendations
• Assisting with learning and research
• Providing general information and advice

What specific area would you like help with?",
    ),
    question: Template::Echo {
        template: "That's a great question! Based on your query about '{input}', I'd be happy \
                   to help. In a production environment, I would provide a detailed, accurate \
                   answer. For now, I'm demonstrating the response system. Could you tell me \
                   more about what specific information you're looking for?",
        prefix_chars: QUESTION_ECHO_CHARS,
    },
    technology: Template::Fixed(
        "I can definitely help with technology and programming topics! I can assist with:
• Code explanations and debugging
• Algorithm design and optimization
• Best practices in software development
• Technology stack recommendations
• System architecture advice
• Programming concepts and tutorials

What specific programming challenge or topic are you working on?",
    ),
    thanks: Template::Pool(&[
        "You're very welcome! I'm glad I could help. Is there anything else I can assist you with?",
        "My pleasure! Don't hesitate to ask if you need more help.",
        "You're welcome! I'm here whenever you need assistance.",
        "Happy to help! Feel free to ask me anything else.",
    ]),
    goodbye: Template::Pool(&[
        "Goodbye! Have a wonderful day, and feel free to come back anytime!",
        "See you later! It was great chatting with you.",
        "Farewell! I'm here whenever you need assistance in the future.",
        "Take care! Don't hesitate to return if you need help.",
    ]),
    business: Some(Template::Fixed(
        "I'm here to help with business and professional topics! I can provide guidance on:
• Business strategy and planning
• Career development and job searching
• Professional communication
• Project management
• Leadership and teamwork
• Industry trends and insights

What business or professional area would you like to explore?",
    )),
    learning: Some(Template::Fixed(
        "I love helping people learn! I can assist with:
• Explaining complex concepts in simple terms
• Study strategies and techniques
• Learning resources and recommendations
• Subject-specific guidance
• Skill development advice
• Educational planning

What subject or skill would you like to learn more about?",
    )),
    advice: Some(Template::Fixed(
        "I'd be happy to offer some thoughtful advice! While I can provide general guidance and \
suggestions, remember that personal situations are unique. I can help with:
• General life advice and tips
• Decision-making frameworks
• Problem-solving approaches
• Goal-setting strategies
• Productivity and time management
• Personal development ideas

What specific area would you like advice on?",
    )),
    fallback: Template::Echo {
        template: "I understand you're asking about '{input}'. This is an interesting topic! In \
                   a production environment with AI integration, I would provide you with a \
                   detailed, accurate response based on current knowledge. For now, I'm \
                   demonstrating the conversation flow. What specific aspect of this topic \
                   interests you most?",
        prefix_chars: FALLBACK_ECHO_CHARS,
    },
};

// ---------------------------------------------------------------------------
// Spanish
// ---------------------------------------------------------------------------

static ES: LanguagePack = LanguagePack {
    greeting: Template::Pool(&[
        "¡Hola! ¿Cómo puedo ayudarte hoy?",
        "¡Hola! ¿En qué puedo asistirte?",
        "¡Saludos! Estoy aquí para ayudar. ¿Qué tienes en mente?",
        "¡Hola! No dudes en preguntarme lo que necesites.",
    ]),
    help: Template::Fixed(
        "Puedo ayudarte con diversas tareas incluyendo:
• Responder preguntas sobre diferentes temas
• Proporcionar explicaciones y definiciones
• Ayudar con la resolución de problemas
• Ofrecer sugerencias y recomendaciones
• Asistir con aprendizaje e investigación
• Proporcionar información y consejos generales

¿En qué área específica te gustaría recibir ayuda?",
    ),
    question: Template::Echo {
        template: "¡Esa es una excelente pregunta! Basado en tu consulta sobre '{input}', \
                   estaré encantado de ayudarte. En un entorno de producción, proporcionaría \
                   una respuesta detallada y precisa. Por ahora, estoy demostrando el sistema \
                   de respuestas. ¿Podrías decirme más sobre qué información específica estás \
                   buscando?",
        prefix_chars: QUESTION_ECHO_CHARS,
    },
    technology: Template::Fixed(
        "¡Definitivamente puedo ayudar con temas de tecnología y programación! Puedo asistirte con:
• Explicaciones de código y depuración
• Diseño y optimización de algoritmos
• Mejores prácticas en desarrollo de software
• Recomendaciones de stack tecnológico
• Consejos de arquitectura de sistemas
• Conceptos y tutoriales de programación

¿Qué desafío específico de programación o tema estás trabajando?",
    ),
    thanks: Template::Pool(&[
        "¡De nada! Me alegra haber podido ayudar. ¿Hay algo más en lo que pueda asistirte?",
        "¡Es un placer! No dudes en pedir más ayuda si la necesitas.",
        "¡Con gusto! Estoy aquí siempre que necesites asistencia.",
        "¡Feliz de ayudar! No dudes en preguntarme cualquier otra cosa.",
    ]),
    goodbye: Template::Pool(&[
        "¡Adiós! ¡Que tengas un excelente día, y no dudes en volver cuando quieras!",
        "¡Hasta luego! Fue un placer conversar contigo.",
        "¡Nos vemos! Estaré aquí siempre que necesites asistencia en el futuro.",
        "¡Cuídate! No dudes en regresar si necesitas ayuda.",
    ]),
    business: None,
    learning: None,
    advice: None,
    fallback: Template::Echo {
        template: "Entiendo que estás preguntando sobre '{input}'. ¡Este es un tema \
                   interesante! En un entorno de producción con integración de IA, te \
                   proporcionaría una respuesta detallada y precisa basada en conocimiento \
                   actual. Por ahora, estoy demostrando el flujo de conversación. ¿Qué aspecto \
                   específico de este tema te interesa más?",
        prefix_chars: FALLBACK_ECHO_CHARS,
    },
};

// ---------------------------------------------------------------------------
// French
// ---------------------------------------------------------------------------

static FR: LanguagePack = LanguagePack {
    greeting: Template::Pool(&[
        "Bonjour ! Comment puis-je vous aider aujourd'hui ?",
        "Salut ! En quoi puis-je vous aider ?",
        "Bonjour ! Je suis là pour aider. Qu'est-ce qui vous préoccupe ?",
        "Bonjour ! N'hésitez pas à me poser des questions.",
    ]),
    help: Template::Fixed(
        "Je peux vous aider avec diverses tâches notamment :
• Répondre à des questions sur différents sujets
• Fournir des explications et des définitions
• Aider à la résolution de problèmes
• Offrir des suggestions et recommandations
• Assister avec l'apprentissage et la recherche
• Fournir des informations et conseils généraux

Dans quel domaine spécifique aimeriez-vous de l'aide ?",
    ),
    question: Template::Echo {
        template: "C'est une excellente question ! Concernant votre demande sur '{input}', je \
                   serai ravi de vous aider. Dans un environnement de production, je fournirais \
                   une réponse détaillée et précise. Pour l'instant, je démontre le système de \
                   réponses. Pourriez-vous me préciser quelle information vous recherchez ?",
        prefix_chars: QUESTION_ECHO_CHARS,
    },
    technology: Template::Fixed(
        "Je peux tout à fait vous aider avec la technologie et la programmation ! Je peux vous assister avec :
• Explications de code et débogage
• Conception et optimisation d'algorithmes
• Bonnes pratiques de développement logiciel
• Recommandations de stack technique
• Conseils d'architecture système
• Concepts et tutoriels de programmation

Sur quel défi ou sujet de programmation travaillez-vous ?",
    ),
    thanks: Template::Pool(&[
        "De rien ! Je suis content d'avoir pu aider. Y a-t-il autre chose que je puisse faire pour vous ?",
        "Avec plaisir ! N'hésitez pas à demander plus d'aide si nécessaire.",
        "Je vous en prie ! Je suis là quand vous avez besoin d'assistance.",
        "Heureux d'aider ! N'hésitez pas à me poser d'autres questions.",
    ]),
    goodbye: Template::Pool(&[
        "Au revoir ! Passez une excellente journée, et revenez quand vous voulez !",
        "À bientôt ! C'était un plaisir de discuter avec vous.",
        "Au revoir ! Je suis là si vous avez besoin d'aide à l'avenir.",
        "Prenez soin de vous ! N'hésitez pas à revenir si besoin.",
    ]),
    business: None,
    learning: None,
    advice: None,
    fallback: Template::Echo {
        template: "Je comprends que vous demandez à propos de '{input}'. C'est un sujet \
                   intéressant ! Dans un environnement de production avec intégration IA, je \
                   vous fournirais une réponse détaillée et précise basée sur les connaissances \
                   actuelles. Pour l'instant, je démontre le flux de conversation. Quel aspect \
                   spécifique de ce sujet vous intéresse le plus ?",
        prefix_chars: FALLBACK_ECHO_CHARS,
    },
};

// ---------------------------------------------------------------------------
// German
// ---------------------------------------------------------------------------

static DE: LanguagePack = LanguagePack {
    greeting: Template::Pool(&[
        "Hallo! Wie kann ich Ihnen heute helfen?",
        "Hallo! Wobei kann ich Ihnen behilflich sein?",
        "Grüße! Ich bin hier, um zu helfen. Was beschäftigt Sie?",
        "Hallo! Fühlen Sie sich frei, mir alles zu fragen.",
    ]),
    help: Template::Fixed(
        "Ich kann Ihnen mit verschiedenen Aufgaben helfen, einschließlich:
• Beantwortung von Fragen zu verschiedenen Themen
• Bereitstellung von Erklärungen und Definitionen
• Hilfe bei der Problemlösung
• Anbieten von Vorschlägen und Empfehlungen
• Unterstützung beim Lernen und Forschen
• Bereitstellung allgemeiner Informationen und Ratschläge

In welchem spezifischen Bereich möchten Sie Hilfe?",
    ),
    question: Template::Echo {
        template: "Das ist eine ausgezeichnete Frage! Zu Ihrer Anfrage über '{input}' helfe ich \
                   Ihnen gerne. In einer Produktionsumgebung würde ich eine detaillierte, genaue \
                   Antwort geben. Derzeit demonstriere ich das Antwortsystem. Können Sie mir \
                   sagen, welche Informationen Sie genau suchen?",
        prefix_chars: QUESTION_ECHO_CHARS,
    },
    technology: Template::Fixed(
        "Bei Technologie- und Programmierthemen kann ich Ihnen auf jeden Fall helfen! Ich unterstütze Sie bei:
• Code-Erklärungen und Fehlersuche
• Entwurf und Optimierung von Algorithmen
• Best Practices in der Softwareentwicklung
• Empfehlungen für den Technologie-Stack
• Beratung zur Systemarchitektur
• Programmierkonzepten und Tutorials

An welcher Programmieraufgabe oder welchem Thema arbeiten Sie?",
    ),
    thanks: Template::Pool(&[
        "Gern geschehen! Ich freue mich, dass ich helfen konnte. Gibt es noch etwas, wobei ich Ihnen behilflich sein kann?",
        "Mit Vergnügen! Zögern Sie nicht, um mehr Hilfe zu bitten, wenn Sie sie benötigen.",
        "Bitte! Ich bin immer da, wenn Sie Unterstützung benötigen.",
        "Freut mich zu helfen! Fühlen Sie sich frei, mir andere Fragen zu stellen.",
    ]),
    goodbye: Template::Pool(&[
        "Auf Wiedersehen! Einen schönen Tag noch, und kommen Sie jederzeit wieder!",
        "Bis später! Es war schön, mit Ihnen zu plaudern.",
        "Tschüss! Ich bin da, wann immer Sie künftig Hilfe brauchen.",
        "Machen Sie es gut! Zögern Sie nicht, wiederzukommen, wenn Sie Hilfe brauchen.",
    ]),
    business: None,
    learning: None,
    advice: None,
    fallback: Template::Echo {
        template: "Ich verstehe, Sie fragen nach '{input}'. Das ist ein interessantes Thema! In \
                   einer Produktionsumgebung mit KI-Integration würde ich Ihnen eine \
                   detaillierte, genaue Antwort basierend auf aktuellem Wissen geben. Derzeit \
                   demonstriere ich den Konversationsablauf. Welcher spezifische Aspekt dieses \
                   Themas interessiert Sie am meisten?",
        prefix_chars: FALLBACK_ECHO_CHARS,
    },
};

// ---------------------------------------------------------------------------
// Portuguese
// ---------------------------------------------------------------------------

static PT: LanguagePack = LanguagePack {
    greeting: Template::Pool(&[
        "Olá! Como posso ajudá-lo hoje?",
        "Oi! Em que posso ajudar?",
        "Saudações! Estou aqui para ajudar. O que você tem em mente?",
        "Olá! Sinta-se à vontade para me perguntar qualquer coisa.",
    ]),
    help: Template::Fixed(
        "Posso ajudá-lo com várias tarefas incluindo:
• Responder perguntas sobre diferentes tópicos
• Fornecer explicações e definições
• Ajudar na resolução de problemas
• Oferecer sugestões e recomendações
• Assistir com aprendizado e pesquisa
• Fornecer informações e conselhos gerais

Em que área específica você gostaria de ajuda?",
    ),
    question: Template::Echo {
        template: "Essa é uma ótima pergunta! Com base na sua consulta sobre '{input}', terei \
                   prazer em ajudar. Em um ambiente de produção, eu forneceria uma resposta \
                   detalhada e precisa. Por enquanto, estou demonstrando o sistema de \
                   respostas. Poderia me dizer mais sobre qual informação específica você \
                   procura?",
        prefix_chars: QUESTION_ECHO_CHARS,
    },
    technology: Template::Fixed(
        "Com certeza posso ajudar com tecnologia e programação! Posso auxiliar com:
• Explicações de código e depuração
• Design e otimização de algoritmos
• Boas práticas em desenvolvimento de software
• Recomendações de stack tecnológico
• Conselhos de arquitetura de sistemas
• Conceitos e tutoriais de programação

Em qual desafio ou tópico de programação você está trabalhando?",
    ),
    thanks: Template::Pool(&[
        "De nada! Fico feliz em ter podido ajudar. Há mais alguma coisa em que possa ajudar?",
        "Com prazer! Não hesite em pedir mais ajuda se precisar.",
        "Por nada! Estou aqui sempre que você precisar de assistência.",
        "Feliz em ajudar! Sinta-se à vontade para me perguntar qualquer outra coisa.",
    ]),
    goodbye: Template::Pool(&[
        "Tchau! Tenha um ótimo dia, e volte quando quiser!",
        "Até logo! Foi um prazer conversar com você.",
        "Até mais! Estarei aqui sempre que precisar de ajuda no futuro.",
        "Cuide-se! Não hesite em voltar se precisar de ajuda.",
    ]),
    business: None,
    learning: None,
    advice: None,
    fallback: Template::Echo {
        template: "Entendo que você está perguntando sobre '{input}'. Este é um tópico \
                   interessante! Em um ambiente de produção com integração de IA, eu forneceria \
                   uma resposta detalhada e precisa baseada em conhecimento atual. Por enquanto, \
                   estou demonstrando o fluxo de conversação. Que aspecto específico deste \
                   tópico mais lhe interessa?",
        prefix_chars: FALLBACK_ECHO_CHARS,
    },
};

// ---------------------------------------------------------------------------
// Italian
// ---------------------------------------------------------------------------

static IT: LanguagePack = LanguagePack {
    greeting: Template::Pool(&[
        "Ciao! Come posso aiutarti oggi?",
        "Ciao! In cosa posso aiutarti?",
        "Saluti! Sono qui per aiutare. Cosa hai in mente?",
        "Ciao! Sentiti libero di chiedermi qualsiasi cosa.",
    ]),
    help: Template::Fixed(
        "Posso aiutarti con varie attività tra cui:
• Rispondere a domande su diversi argomenti
• Fornire spiegazioni e definizioni
• Aiutare nella risoluzione dei problemi
• Offrire suggerimenti e raccomandazioni
• Assistere con apprendimento e ricerca
• Fornire informazioni e consigli generali

In quale area specifica vorresti aiuto?",
    ),
    question: Template::Echo {
        template: "Ottima domanda! In base alla tua richiesta su '{input}', sarò felice di \
                   aiutarti. In un ambiente di produzione, fornirei una risposta dettagliata e \
                   accurata. Per ora, sto dimostrando il sistema di risposte. Potresti dirmi di \
                   più su quale informazione specifica stai cercando?",
        prefix_chars: QUESTION_ECHO_CHARS,
    },
    technology: Template::Fixed(
        "Posso sicuramente aiutarti con tecnologia e programmazione! Posso assisterti con:
• Spiegazioni del codice e debugging
• Progettazione e ottimizzazione di algoritmi
• Buone pratiche nello sviluppo software
• Raccomandazioni sullo stack tecnologico
• Consigli di architettura di sistema
• Concetti e tutorial di programmazione

Su quale sfida o argomento di programmazione stai lavorando?",
    ),
    thanks: Template::Pool(&[
        "Prego! Sono felice di aver potuto aiutare. C'è altro che posso fare per te?",
        "Con piacere! Non esitare a chiedere più aiuto se necessario.",
        "Prego! Sono qui ogni volta che hai bisogno di assistenza.",
        "Felice di aiutare! Sentiti libero di chiedermi qualsiasi altra cosa.",
    ]),
    goodbye: Template::Pool(&[
        "Arrivederci! Buona giornata, e torna quando vuoi!",
        "A presto! È stato un piacere chiacchierare con te.",
        "Ciao! Sono qui ogni volta che avrai bisogno di aiuto in futuro.",
        "Abbi cura di te! Non esitare a tornare se hai bisogno di aiuto.",
    ]),
    business: None,
    learning: None,
    advice: None,
    fallback: Template::Echo {
        template: "Capisco che stai chiedendo di '{input}'. Questo è un argomento interessante! \
                   In un ambiente di produzione con integrazione IA, ti fornirei una risposta \
                   dettagliata e accurata basata sulla conoscenza attuale. Per ora, sto \
                   dimostrando il flusso di conversazione. Quale aspetto specifico di questo \
                   argomento ti interessa di più?",
        prefix_chars: FALLBACK_ECHO_CHARS,
    },
};

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> TemplateStore {
        TemplateStore::new(Arc::new(FixedPicker(0)))
    }

    fn pool_of(language: Language, intent: Intent) -> &'static [&'static str] {
        match pack(language).template_for(intent) {
            Template::Pool(pool) => pool,
            other => panic!("expected a pool, got {other:?}"),
        }
    }

    #[test]
    fn english_question_embeds_first_fifty_chars() {
        let input = "What is the capital of France?";
        let text = store().render(Language::English, Intent::Question, input);
        assert!(text.starts_with(
            "That's a great question! Based on your query about 'What is the capital of France?...', "
        ));
    }

    #[test]
    fn long_input_is_truncated_by_chars() {
        let input = "ñ".repeat(80);
        let text = store().render(Language::Spanish, Intent::Question, &input);
        let expected = format!("'{}...'", "ñ".repeat(50));
        assert!(text.contains(&expected));
        assert!(!text.contains(&"ñ".repeat(51)));
    }

    #[test]
    fn english_statement_length_dispatch() {
        let s = store();
        assert_eq!(
            s.render(Language::English, Intent::Statement, "pizza night"),
            EN_NEED_DETAIL.render("", &FixedPicker(0))
        );
        let long = "word ".repeat(21);
        assert!(
            s.render(Language::English, Intent::Statement, &long)
                .starts_with("That's quite detailed!")
        );
        let mid = "I really enjoy long walks on the beach at sunset";
        let text = s.render(Language::English, Intent::Statement, mid);
        assert!(
            text.starts_with("I understand you're asking about 'I really enjoy long walks on t...'")
        );
    }

    #[test]
    fn statement_boundaries() {
        let s = store();
        // exactly three words and exactly twenty words take the echo path.
        let three = s.render(Language::English, Intent::Statement, "one two three");
        assert!(three.starts_with("I understand"));
        let twenty = "w ".repeat(20);
        let text = s.render(Language::English, Intent::Statement, &twenty);
        assert!(text.starts_with("I understand"));
    }

    #[test]
    fn untranslated_intents_use_the_language_fallback() {
        let s = store();
        for language in Language::ALL.into_iter().filter(|l| *l != Language::English) {
            for intent in [Intent::Business, Intent::Learning, Intent::Advice, Intent::Statement] {
                let text = s.render(language, intent, "quarterly numbers");
                let fallback = pack(language).fallback.render("quarterly numbers", &FixedPicker(0));
                assert_eq!(text, fallback, "{language} / {intent}");
                assert!(text.contains("'quarterly numbers...'"));
            }
        }
    }

    #[test]
    fn non_english_fallbacks_are_not_english() {
        let s = store();
        let english = s.render(
            Language::English,
            Intent::Statement,
            "just a moderate sentence here",
        );
        for language in Language::ALL.into_iter().filter(|l| *l != Language::English) {
            assert_ne!(
                s.render(language, Intent::Statement, "just a moderate sentence here"),
                english
            );
        }
    }

    #[test]
    fn pool_responses_come_from_the_pool() {
        let s = TemplateStore::default();
        for language in Language::ALL {
            for intent in [Intent::Greeting, Intent::Thanks, Intent::Goodbye] {
                let pool = pool_of(language, intent);
                assert!((2..=4).contains(&pool.len()));
                for _ in 0..10 {
                    let text = s.render(language, intent, "x");
                    assert!(pool.contains(&text.as_str()), "{language} / {intent}: {text}");
                }
            }
        }
    }

    #[test]
    fn fixed_picker_selects_index() {
        let s = TemplateStore::new(Arc::new(FixedPicker(2)));
        assert_eq!(
            s.render(Language::Italian, Intent::Greeting, "ciao"),
            "Saluti! Sono qui per aiutare. Cosa hai in mente?"
        );
        // out-of-range indices clamp to the last entry
        assert_eq!(FixedPicker(99).pick(4), 3);
    }

    #[test]
    fn truncate_chars_handles_short_and_multibyte() {
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("ééé", 2), "éé");
        assert_eq!(truncate_chars("", 5), "");
    }
}
