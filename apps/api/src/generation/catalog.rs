//! Static catalogs the prompt builder samples from.
//!
//! Every table is a `static` slice: built at compile time, read-only for the
//! life of the process, shared freely across concurrent requests.

/// A top-level theme and the narrower subthemes that can seed a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub subthemes: &'static [&'static str],
    /// Phrasing prefixes that read naturally for this theme.
    pub starters: &'static [&'static str],
}

/// Curated example questions for one perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerspectiveExamples {
    pub perspective: &'static str,
    pub questions: &'static [&'static str],
}

pub static THEMES: &[Theme] = &[
    // Relationships
    Theme {
        name: "trust",
        subthemes: &["keeping promises", "being let down", "earning trust back"],
        starters: &["when did", "who taught", "what moment"],
    },
    Theme {
        name: "friendship",
        subthemes: &["old friends", "making new friends", "friends who stayed"],
        starters: &["how did", "who was", "what moment"],
    },
    Theme {
        name: "family",
        subthemes: &["family traditions", "siblings", "grandparents", "family meals"],
        starters: &["what tradition", "who in", "how did"],
    },
    Theme {
        name: "love",
        subthemes: &["showing care", "first impressions", "small gestures"],
        starters: &["how do", "what gesture", "when did"],
    },
    Theme {
        name: "connection",
        subthemes: &["unexpected conversations", "feeling understood", "shared interests"],
        starters: &["who made", "what conversation", "when did"],
    },
    // Personal growth
    Theme {
        name: "change",
        subthemes: &["new habits", "moving somewhere new", "changing your mind"],
        starters: &["what changed", "how did", "when did"],
    },
    Theme {
        name: "challenges",
        subthemes: &["hard days", "asking for help", "overcoming fear"],
        starters: &["what helped", "how did", "what moment"],
    },
    Theme {
        name: "learning",
        subthemes: &["favourite teachers", "learning from mistakes", "new skills"],
        starters: &["what did", "who taught", "how did"],
    },
    Theme {
        name: "strengths",
        subthemes: &["hidden talents", "compliments", "being relied on"],
        starters: &["what are", "when did", "what do"],
    },
    Theme {
        name: "decisions",
        subthemes: &["big choices", "trusting your gut", "saying no"],
        starters: &["what decision", "how did", "what made"],
    },
    // Values
    Theme {
        name: "purpose",
        subthemes: &["meaningful work", "what gets you up", "small daily joys"],
        starters: &["what makes", "when do", "what gives"],
    },
    Theme {
        name: "success",
        subthemes: &["proud moments", "quiet wins", "defining success"],
        starters: &["what moment", "how do", "what was"],
    },
    Theme {
        name: "beliefs",
        subthemes: &["values from home", "changing opinions", "life rules"],
        starters: &["what do", "who shaped", "how has"],
    },
    Theme {
        name: "passion",
        subthemes: &["hobbies", "losing track of time", "creative projects"],
        starters: &["what could", "how did", "what hobby"],
    },
    Theme {
        name: "helping others",
        subthemes: &["kindness from strangers", "volunteering", "being there for someone"],
        starters: &["when did", "how do", "who helped"],
    },
    Theme {
        name: "motivation",
        subthemes: &["fresh starts", "role models", "keeping going"],
        starters: &["what keeps", "who inspires", "what gets"],
    },
    // Life experiences
    Theme {
        name: "adventures",
        subthemes: &["travel", "spontaneous trips", "trying something new"],
        starters: &["where did", "what adventure", "what was"],
    },
    Theme {
        name: "achievements",
        subthemes: &["milestones", "hard-won skills", "team wins"],
        starters: &["what achievement", "how did", "what moment"],
    },
    Theme {
        name: "mistakes",
        subthemes: &["funny mishaps", "lessons learned", "second chances"],
        starters: &["what mistake", "what did", "how did"],
    },
    Theme {
        name: "surprises",
        subthemes: &["unexpected gifts", "plot twists", "surprise visits"],
        starters: &["what surprised", "when did", "what was"],
    },
    Theme {
        name: "transition",
        subthemes: &["starting a new job", "leaving home", "new chapters"],
        starters: &["how did", "what helped", "what moment"],
    },
    Theme {
        name: "celebration",
        subthemes: &["birthdays", "small victories", "favourite holidays"],
        starters: &["how do", "what celebration", "what was"],
    },
];

pub static PERSPECTIVES: &[&str] = &["childhood", "past", "present moment", "future aspirations"];

pub static MODIFIERS: &[&str] = &[
    "warm",
    "playful",
    "nostalgic",
    "hopeful",
    "bittersweet",
    "lighthearted",
    "curious",
    "grateful",
    "reflective",
    "uplifting",
];

pub static EXAMPLES: &[PerspectiveExamples] = &[
    PerspectiveExamples {
        perspective: "childhood",
        questions: &[
            "What games did you love playing as a child?",
            "Who was your favourite person to spend time with growing up?",
            "What made you really happy as a child?",
            "What place did you love visiting in your childhood?",
            "What did you dream about becoming when you were young?",
        ],
    },
    PerspectiveExamples {
        perspective: "past",
        questions: &[
            "What's a moment from your past that changed you?",
            "What's one of your favourite memories?",
            "What's the most adventurous thing you've done?",
            "What's the best advice someone gave you?",
            "What skill are you glad you learned?",
        ],
    },
    PerspectiveExamples {
        perspective: "present moment",
        questions: &[
            "What makes you smile these days?",
            "What are you excited about right now?",
            "What's bringing you joy lately?",
            "What new thing are you learning?",
            "What do you like most about your life right now?",
        ],
    },
    PerspectiveExamples {
        perspective: "future aspirations",
        questions: &[
            "What dream would you love to pursue?",
            "What new skill do you want to learn?",
            "Where would you love to travel next?",
            "What positive change do you want to make?",
            "What adventure would you like to experience?",
        ],
    },
];

/// Returns the curated example questions for a perspective.
pub fn examples_for(perspective: &str) -> &'static [&'static str] {
    EXAMPLES
        .iter()
        .find(|e| e.perspective == perspective)
        .map(|e| e.questions)
        .unwrap_or(&[])
}
