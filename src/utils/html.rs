// src/utils/html.rs

/// Trims `input` and sanitizes it with ammonia.
///
/// Whitelist-based: safe inline tags survive, `<script>` and friends are
/// stripped together with their content, bare `<`/`>` are entity-escaped.
/// Question and option text pass through here before storage, so the text a
/// student sees is exactly the text their answer is compared against.
pub fn clean_text(input: &str) -> String {
    ammonia::clean(input.trim()).trim().to_string()
}
