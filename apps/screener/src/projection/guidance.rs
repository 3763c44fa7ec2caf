// Fixed copy for the recommendation blocks. The projector decides which
// blocks appear; the wording lives here.

pub const NO_MISSING_KEYWORDS: &str = "Great job! No missing keywords detected.";

pub const SKILL_GAP_TITLE: &str = "Bridge the Skill Gap";

pub const SKILL_GAP_INTRO: &str =
    "The following keywords are missing from your resume but are important for this role:";

pub const SKILL_GAP_FOCUS: &str = "Focus on the high-priority skills marked first!";

pub const SKILL_GAP_ACTION: &str = "Incorporate these skills into your \"Skills\" section \
    or weave them into your project descriptions where applicable.";

pub const SEMANTIC_ALIGNMENT_TITLE: &str = "Improve Semantic Alignment";

pub const SEMANTIC_ALIGNMENT_SUMMARY: &str =
    "Your resume's content is somewhat aligned, but could be stronger.";

pub const SEMANTIC_ALIGNMENT_ACTIONS: [&str; 3] = [
    "Use action verbs (e.g., \"Developed\", \"Led\", \"Optimized\") to start bullet points.",
    "Quantify your achievements (e.g., \"Improved efficiency by 20%\").",
    "Mirror the language used in the job description for key responsibilities.",
];

pub const GENERAL_TIPS_TITLE: &str = "General Tips";

pub const GENERAL_TIPS_BODY: &str = "Always proofread for typos and ensure your contact \
    information is up to date. Tailoring your resume for each specific application \
    significantly increases your chances of getting shortlisted.";
