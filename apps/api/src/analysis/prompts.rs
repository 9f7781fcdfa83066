// All LLM prompt constants for the Analysis module.
// Each system prompt is joined with llm_client::prompts::JSON_ONLY_SYSTEM at call time.

/// System prompt for interview question generation.
pub const QUESTIONS_SYSTEM: &str = "You are an expert in coming up with follow up questions \
    to uncover deeper insights. You design short, conversational interview questions that a \
    voice interviewer can ask aloud.";

/// Question generation prompt template.
/// Replace: {name}, {objective}, {number}, {context}
pub const QUESTIONS_PROMPT_TEMPLATE: &str = r#"Imagine you are an interviewer specialized in designing interview questions to help hiring managers find candidates with strong technical expertise and project experience, making it easier to identify the ideal fit for the role.

Interview Title: {name}
Interview Objective: {objective}
Number of questions to be generated: {number}

Follow these detailed guidelines when crafting the questions:
- Focus on evaluating the candidate's technical knowledge and their experience working on relevant projects.
- Include questions designed to assess problem-solving skills through practical examples.
- Soft skills such as communication and teamwork should not be the main focus but can be addressed where appropriate.
- Each question must be concise, clear and no longer than 30 words.
- Do not number the questions.

Use the following context, when present, to generate the questions:
{context}

Also write a 50 word or less second-person description of the interview for the candidate. Do not reveal the questions.

Return a JSON object with this EXACT schema:
{
  "questions": [{"question": "..."}],
  "description": "..."
}"#;

/// System prompt for cross-response insights.
pub const INSIGHTS_SYSTEM: &str = "You are an expert hiring analyst. You read many short \
    call summaries for one interview and surface the patterns a hiring manager should know.";

/// Insights prompt template.
/// Replace: {call_summaries}, {name}, {objective}, {description}
pub const INSIGHTS_PROMPT_TEMPLATE: &str = r#"These are the summaries of every candidate call for one interview.

Interview Title: {name}
Interview Objective: {objective}
Interview Description: {description}

CALL SUMMARIES:
{call_summaries}

Write 3 short insights (each 25 words or less) about the candidate pool, focused on skills and gaps relevant to the objective. Do not name individual candidates.

Return a JSON object with this EXACT schema:
{
  "insights": ["...", "...", "..."]
}"#;

/// System prompt for communication-skill analysis.
pub const COMMUNICATION_SYSTEM: &str = "You are an expert in analyzing communication skills \
    from interview transcripts. You are objective and back every judgement with quotes.";

/// Communication analysis prompt template. Replace `{transcript}` before sending.
pub const COMMUNICATION_PROMPT_TEMPLATE: &str = r#"Analyze the communication skills of the candidate in the following interview transcript.

TRANSCRIPT:
{transcript}

Consider clarity, structure, conciseness, vocabulary and how well the candidate listens and responds.

Return a JSON object with this EXACT schema:
{
  "communicationScore": 0,
  "overallFeedback": "...",
  "supportingQuotes": [
    {"quote": "...", "analysis": "...", "type": "strength"}
  ]
}

communicationScore is a number from 0 to 10. type is "strength" or "improvement_area"."#;

/// System prompt for per-response analytics.
pub const ANALYTICS_SYSTEM: &str = "You are an expert in analyzing interview transcripts. \
    You score candidates fairly and summarise their answers to each main question.";

/// Analytics prompt template.
/// Replace: {transcript}, {questions}
pub const ANALYTICS_PROMPT_TEMPLATE: &str = r#"Analyse the following interview transcript.

TRANSCRIPT:
{transcript}

MAIN INTERVIEW QUESTIONS:
{questions}

Return a JSON object with this EXACT schema:
{
  "overallScore": 0,
  "overallFeedback": "...",
  "communication": {"score": 0, "feedback": "..."},
  "generalIntelligence": "...",
  "softSkillSummary": "...",
  "questionSummaries": [{"question": "...", "summary": "..."}]
}

Rules:
- overallScore is 0 to 100; communication.score is 0 to 10.
- overallFeedback and communication.feedback are 60 words or less.
- softSkillSummary covers confidence, leadership, adaptability and critical thinking in 50 words or less.
- questionSummaries has one entry per main interview question, in order. If a question was not asked, summarise it as "Not asked"."#;
