//! Prompt construction for the LLM endpoints

/// Knowledge base used when the caller supplies none
pub const DEFAULT_KNOWLEDGE_BASE: &str = "
KNOWLEDGE BASE DOCUMENTS:
1. Document 1 (CNC Specifications):
   - Pełna nazwa maszyny CNC: Apzumi Spatial Titan CNC 5-Axis
   - Waga: Maszyna waży 4500 kg.
   - Zasilanie: Maszyna wymaga zasilania trójfazowego 400V.

2. Document 2 (Text Note / Warning):
   - IMPORTANT! REGULARLY CHECK COOLANT LEVELS TO PREVENT OVERHEATING!
   - Należy regularnie sprawdzać poziom chłodziwa (cieczy chłodzącej), aby zapobiec przegrzaniu wrzeciona i narzędzi.
";

/// Answer used when the model returns nothing
pub const EMPTY_ANSWER_FALLBACK: &str = "Przepraszam, wystąpił błąd w generowaniu odpowiedzi.";

/// Sample text used when the model returns nothing
pub const EMPTY_SAMPLE_FALLBACK: &str = "Przykładowa treść dokumentu.";

/// Knowledge base section of the chat prompt
///
/// Blank custom knowledge falls back to [`DEFAULT_KNOWLEDGE_BASE`].
#[must_use]
pub fn knowledge_base(custom: Option<&str>) -> String {
    match custom {
        Some(custom) if !custom.trim().is_empty() => {
            format!("KNOWLEDGE BASE DOCUMENTS (CUSTOM):\n{custom}")
        }
        _ => DEFAULT_KNOWLEDGE_BASE.to_owned(),
    }
}

/// Prompt answering `query` strictly from the knowledge base
#[must_use]
pub fn chat_prompt(query: &str, custom_knowledge: Option<&str>) -> String {
    format!(
        "You are a helpful AI Assistant for Apzumi Spatial.
Your task is to answer the user's question based strictly on the provided knowledge base.
If the information is not in the knowledge base, you must state that you do not have that information without guessing.
Keep your answer very concise: maximum 2 to 4 short sentences. Answer in Polish.

{}

User Question: {query}
",
        knowledge_base(custom_knowledge)
    )
}

/// Prompt generating a short sample document about `topic`
#[must_use]
pub fn sample_prompt(topic: &str) -> String {
    format!(
        "Jesteś asystentem pomagającym w tworzeniu przykładowych baz wiedzy.
Użytkownik podał następujący temat/tytuł dokumentu: \"{topic}\".
Wygeneruj krótki, zwięzły (max 4-5 zdań lub punktów) przykładowy tekst, który mógłby stanowić treść takiego dokumentu w bazie wiedzy.
Zwróć TYLKO wygenerowany tekst, bez form grzecznościowych, bez wstępów typu \"Oto tekst\". Tekst musi być w języku polskim."
    )
}
