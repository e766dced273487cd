//! Prompt construction for every capability call. The literal wording here is
//! not contractual; the field layout (context / previous answer / content /
//! query / continuation marker) is.

// ── Fixed user-visible messages ────────────────────────────────────────────────

pub const NO_RELEVANT_FILES: &str = "No relevant files found";
pub const COULD_NOT_PROCESS: &str =
    "Could not process any files due to token limitations or file access issues.";
pub const NO_FILES_FALLBACK_PREFIX: &str =
    "No relevant files found for query, answering from the model alone.";

// ── Relevance search ───────────────────────────────────────────────────────────

/// Classification prompt: (query, batch of rendered records) -> JSON list of
/// candidate paths. Non-technical or conversational queries are expected to
/// yield an empty list; that contract lives in the instructions, not the code.
pub fn relevance_search(query: &str, mapping_batch: &str) -> String {
    format!(
        "You are an AI assistant helping users find relevant files in a codebase.\n\
         Analyze the user query carefully - if it is just a greeting or does not contain\n\
         a specific technical question or request, return an empty list of files.\n\n\
         Each entry below describes one file:\n\
         file_name: path relative to the source root\n\
         Description: what the file does\n\
         Functions: comma-separated function names\n\n\
         User Query: {query}\n\n\
         Available Files:\n{mapping_batch}\n\n\
         Return files ONLY if the query contains a specific technical question or request.\n\
         Respond ONLY with valid JSON: {{\"files\": [\"path/one\", \"path/two\"]}}"
    )
}

// ── Code query ─────────────────────────────────────────────────────────────────

/// Synthesis prompt for one round. `previous` is the prior round's full output
/// (empty on the first round); `has_more` flips the partial/complete framing
/// and tells the model its output will be extended by later rounds.
pub fn code_query(
    context: &str,
    previous: &str,
    content: &str,
    query: &str,
    has_more: bool,
) -> String {
    let previous_block = if previous.is_empty() {
        String::new()
    } else {
        format!("Previous partial response:\n{previous}\n\n")
    };

    let (continuation_note, response_type) = if has_more {
        (
            "NOTE: There are more files to analyze after this. Provide a partial response \
             based on the current files only; it will be extended with the remaining files. \
             Carry forward everything relevant from the previous partial response.\n\n",
            "partial",
        )
    } else {
        ("", "complete")
    };

    format!(
        "You are an expert software developer and code analyst.\n\n\
         Guidelines:\n\
         1. For general greetings or non-technical queries, respond briefly and naturally\n\
         2. For technical questions: analyze the code thoroughly, reference specific parts\n\
            of the code when relevant, and acknowledge any uncertainties\n\
         3. Keep responses concise and relevant to the query's complexity\n\
         4. If this is a continuation of a previous response, build upon it without\n\
            repeating information\n\n\
         Additional Context Information:\n{context}\n\n\
         {previous_block}\
         Code Files Content:\n{content}\n\
         User Question: {query}\n\n\
         {continuation_note}\
         Please provide a {response_type} answer that matches the complexity and nature of the query:"
    )
}

/// Direct call used when verification produced no files: bare query behind an
/// explanatory note so the model does not hallucinate file contents.
pub fn no_files_query(query: &str) -> String {
    format!(
        "No files from the indexed codebase matched this question; answer from general \
         knowledge and say so when the answer would need the actual code.\n\n\
         User Question: {query}"
    )
}

// ── Mapping phase ──────────────────────────────────────────────────────────────

/// Per-file analysis prompt: content -> {{description, functions}} JSON.
pub fn file_mapping(file_name: &str, file_content: &str) -> String {
    format!(
        "You are an expert developer analyzing a source file. Focus on what the code\n\
         actually does or represents in terms of business logic or system functionality,\n\
         not on the kind of file it is (test, manager, helper).\n\n\
         File name: {file_name}\n\
         {file_content}\n\n\
         Respond ONLY with valid JSON:\n\
         {{\"description\": \"a deep and clear description of what the file does\",\n \
          \"functions\": \"comma-separated function names implemented in the file\"}}"
    )
}

/// Whole-summary rewrite prompt: the summary is replaced in full each time.
pub fn summary_update(existing_summary: &str, file_name: &str, file_content: &str) -> String {
    format!(
        "You are a professional technical writer maintaining a comprehensive, cohesive,\n\
         natural-language description of a software project for developers, managers,\n\
         and stakeholders. No code snippets.\n\n\
         1. Read the existing project summary to understand the overall context.\n\
         2. Incorporate relevant details from the new file's content.\n\
         3. Keep the updated summary easy to read and free of code snippets.\n\n\
         Current Project Summary:\n{existing_summary}\n\n\
         New File:\n{file_name}\n\n\
         File Content:\n{file_content}\n\n\
         Updated Project Summary (natural language only):"
    )
}

// ── Prompt improver ────────────────────────────────────────────────────────────

pub fn prompt_improver(documentation: &str, query: &str) -> String {
    format!(
        "You are an expert prompt engineer. Restructure the user's query into a clear,\n\
         concise prompt for code generation.\n\n\
         Guidelines:\n\
         1. Maintain the original intent; be more specific and detailed\n\
         2. Include relevant technical context from the documentation\n\
         3. Stay concise (2-3 sentences); add no complexity beyond the request\n\n\
         Documentation Context:\n{documentation}\n\n\
         Original User Query:\n{query}\n\n\
         Improved prompt:"
    )
}

// ── Tests ──────────────────────────────────────────────────────────────────────
