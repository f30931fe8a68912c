//! Prompt builders for question generation and answer scoring

/// Ask for exactly one new theoretical interview question about `subject`,
/// returned as a JSON object so parsing stays mechanical
pub fn question_prompt(subject: &str) -> String {
    format!(
        "You are an interview coach. Return only a single new random theoretical {subject} \
         interview question - no additional text or explanation. Generate a new question \
         every time. Respond as a JSON object: {{\"question\": \"<the question>\"}}"
    )
}

/// Scoring rubric for a transcribed spoken answer
///
/// The answer text comes from speech recognition, so the model is told to
/// ignore recognition artifacts and judge the core meaning only.
pub fn scoring_prompt(question: &str, transcript: &str) -> String {
    format!(
        "You are an interview coach. The answer you'll review comes from speech-to-text \
         transcription. Ignore minor recognition errors and filler words. Focus on \
         evaluating core meaning.\n\n\
         Question: {question}\n\
         Answer: {transcript}\n\n\
         Provide your evaluation as a JSON object:\n\
         {{\n\
           \"correctness\": <integer 0-5, how relevant the answer was; 0 if incorrect>,\n\
           \"completeness\": <integer 0-5, how complete the answer was; 0 if incorrect>,\n\
           \"feedback\": \"<detailed feedback in max 150 words>\"\n\
         }}"
    )
}
