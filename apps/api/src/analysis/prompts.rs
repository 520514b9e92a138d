// Prompt for resume-vs-job analysis. Only the three inputs vary.

/// Builds the analysis instruction, embedding the inputs verbatim.
pub fn build_analysis_prompt(resume_text: &str, job_title: &str, job_description: &str) -> String {
    format!(
        r#"Task: Analyze how well the candidate's resume aligns with the job posting.

Job Title: {job_title}

Job Description:
{job_description}

Resume:
{resume_text}

Please provide a detailed analysis in JSON format with the following structure:
1. "score": A number between 0-100 indicating overall match percentage
2. "summary": Brief summary of the analysis (2-3 sentences)
3. "strengths": Array of key strengths found in the resume relative to the job (up to 5)
4. "gaps": Array of missing skills or experiences from the job requirements (up to 5)
5. "extracted_info": Object containing:
   - "name": Candidate's name
   - "email": Candidate's email
   - "experience": Array of work experiences with "company", "title", "duration"
   - "education": Array of education entries with "institution", "degree", "field"
   - "skills": Array of skills extracted from resume

The response must be valid JSON.
"#
    )
}
