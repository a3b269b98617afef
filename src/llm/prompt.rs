//! Instructions sent to the providers.

/// System instruction for chat-style providers. The diff goes in the user turn.
pub const SYSTEM_INSTRUCTION: &str = "You write git commit messages. \
Produce only a conventional commit message (type(scope): summary, optionally \
followed by a blank line and a short body) for the diff the user sends. \
Do not add narration, explanations, or any text before or after the message.";

/// Build the single-turn prompt for prompt-style providers.
pub fn build_prompt(diff: &str) -> String {
    format!(
        r#"Generate a concise, conventional commit message for the following git diff.
Focus on technical accuracy and clarity.

Rules:
- Format: `type(scope): summary`, optionally followed by a blank line and a short body
- Type: one of feat, fix, build, chore, ci, docs, style, refactor, perf, test
- Imperative mood, no period at the end of the summary
- Respond with ONLY the commit message inside a single ``` fenced block, no explanation

<diff>
{diff}
</diff>"#
    )
}
