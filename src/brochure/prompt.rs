use crate::utils::truncate_chars;

/// Reference text passed to the model is cut to this many characters
pub const BROCHURE_CONTEXT_CHARS: usize = 4000;

/// Returned instead of a completion when no brochure text is available
pub const BROCHURE_UNAVAILABLE: &str =
    "Sorry, I couldn't retrieve brochure information at the moment.";

/// Build the user prompt for a brochure question.
///
/// The brochure is hard-cut at [`BROCHURE_CONTEXT_CHARS`]. Callers must
/// short-circuit on empty text before calling this.
pub fn build_brochure_prompt(question: &str, brochure_text: &str) -> String {
    format!(
        "\nYou are a real estate voice assistant. The user is asking: \"{}\"\n\
         Use only the information from the following brochure to answer:\n\
         \n\
         Brochure:\n\
         {}\n",
        question,
        truncate_chars(brochure_text, BROCHURE_CONTEXT_CHARS)
    )
}
