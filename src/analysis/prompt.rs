//! Instruction sent alongside the audio.

/// Moods the model chooses from.
pub const MOODS: &[&str] = &["energetic", "calm", "melancholic", "happy"];

/// Genres the model chooses from.
pub const GENRES: &[&str] = &["technology", "business", "entertainment", "news"];

pub fn analysis_instruction() -> String {
    format!(
        "Analyze this audio file and provide:\n\
         1. Main topic/content (2-3 sentences)\n\
         2. Mood ({moods})\n\
         3. Genre ({genres})\n\
         4. Target audience\n\
         5. 3-5 keywords\n\
         \n\
         Format as JSON: a single object with exactly these keys: \
         \"topic\" (string), \"mood\" (string), \"genre\" (string), \
         \"audience\" (string), \"keywords\" (array of strings).\n",
        moods = MOODS.join("/"),
        genres = GENRES.join("/"),
    )
}
