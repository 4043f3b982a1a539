//! Fixed system instructions for the two generation calls.

/// Returned by the model when the context does not hold the answer
pub const REFUSAL_SENTENCE: &str = "I could not find the answer in the provided document.";

pub const DEFAULT_PERSONA: &str = "You are a Data Structure and Algorithm Expert.";

pub const REWRITE_INSTRUCTION: &str = "You are a query rewriting expert. \
Based on the provided chat history, rephrase the latest user question into a complete, \
standalone question that can be understood without the chat history. \
Use the earlier turns only to resolve what the question refers to. \
Only return the rewritten question and nothing else.";

/// System instruction for the grounded answer, with the retrieved context inlined verbatim
pub fn answer_instruction(persona: &str, context: &str) -> String {
    format!(
        "{persona}
You will be given a context of relevant information and a user question.
Your task is to answer the user's question based ONLY on the provided context.
If the answer is not in the context, say \"{REFUSAL_SENTENCE}\"
Keep your answers clear, concise, and educational.

Context: {context}"
    )
}
