//! Data-driven vocabulary and known-work tables.
//!
//! Genre/category detection and the canonical-work bias live here as plain
//! data so rules can be tuned and tested without touching scoring control
//! flow.

/// A landmark title/author pair used to bias ranking toward canonical
/// recommendations
#[derive(Debug, Clone, Copy)]
pub struct KnownWork {
    pub title: &'static str,
    pub author: &'static str,
}

/// Detection keywords, known works, and canonical provider queries for one
/// technical topic area
#[derive(Debug, Clone, Copy)]
pub struct CategoryRules {
    pub id: &'static str,
    /// Keywords whose presence in a query maps it to this category
    pub detect: &'static [&'static str],
    /// Landmark works for the category
    pub known_works: &'static [KnownWork],
    /// Canonical search strings substituted as provider query variants, to
    /// compensate for providers with weak free-text relevance
    pub canonical_queries: &'static [&'static str],
}

pub static CATEGORIES: &[CategoryRules] = &[
    CategoryRules {
        id: "machine_learning",
        detect: &[
            "machine learning",
            "deep learning",
            "neural network",
            "机器学习",
            "深度学习",
            "神经网络",
        ],
        known_works: &[
            KnownWork { title: "Machine Learning", author: "Tom Mitchell" },
            KnownWork {
                title: "Pattern Recognition and Machine Learning",
                author: "Christopher Bishop",
            },
            KnownWork { title: "Deep Learning", author: "Ian Goodfellow" },
            KnownWork {
                title: "Hands-On Machine Learning",
                author: "Aurélien Géron",
            },
            KnownWork { title: "统计学习方法", author: "李航" },
        ],
        canonical_queries: &[
            "machine learning mitchell",
            "pattern recognition machine learning bishop",
            "deep learning goodfellow",
        ],
    },
    CategoryRules {
        id: "algorithms",
        detect: &["algorithm", "data structure", "算法", "数据结构"],
        known_works: &[
            KnownWork {
                title: "Introduction to Algorithms",
                author: "Thomas H. Cormen",
            },
            KnownWork {
                title: "The Algorithm Design Manual",
                author: "Steven Skiena",
            },
            KnownWork { title: "Algorithms", author: "Robert Sedgewick" },
        ],
        canonical_queries: &[
            "introduction to algorithms cormen",
            "algorithm design manual skiena",
        ],
    },
    CategoryRules {
        id: "operating_systems",
        detect: &["operating system", "kernel", "操作系统", "内核"],
        known_works: &[
            KnownWork {
                title: "Operating Systems: Three Easy Pieces",
                author: "Remzi Arpaci-Dusseau",
            },
            KnownWork {
                title: "Modern Operating Systems",
                author: "Andrew S. Tanenbaum",
            },
            KnownWork {
                title: "Computer Systems: A Programmer's Perspective",
                author: "Randal Bryant",
            },
            KnownWork { title: "深入理解计算机系统", author: "Randal Bryant" },
        ],
        canonical_queries: &[
            "operating systems three easy pieces",
            "modern operating systems tanenbaum",
        ],
    },
    CategoryRules {
        id: "networking",
        detect: &["network", "tcp", "http", "网络", "计算机网络"],
        known_works: &[
            KnownWork {
                title: "Computer Networking: A Top-Down Approach",
                author: "James Kurose",
            },
            KnownWork {
                title: "TCP/IP Illustrated",
                author: "W. Richard Stevens",
            },
        ],
        canonical_queries: &[
            "computer networking top-down approach kurose",
            "tcp/ip illustrated stevens",
        ],
    },
    CategoryRules {
        id: "databases",
        detect: &["database", "sql", "数据库"],
        known_works: &[
            KnownWork {
                title: "Database System Concepts",
                author: "Abraham Silberschatz",
            },
            KnownWork {
                title: "Designing Data-Intensive Applications",
                author: "Martin Kleppmann",
            },
        ],
        canonical_queries: &[
            "database system concepts silberschatz",
            "designing data-intensive applications kleppmann",
        ],
    },
    CategoryRules {
        id: "programming",
        detect: &[
            "programming",
            "software engineering",
            "python",
            "rust",
            "java",
            "编程",
            "软件工程",
        ],
        known_works: &[
            KnownWork {
                title: "The Pragmatic Programmer",
                author: "Andrew Hunt",
            },
            KnownWork { title: "Clean Code", author: "Robert C. Martin" },
            KnownWork { title: "Code Complete", author: "Steve McConnell" },
        ],
        canonical_queries: &["pragmatic programmer hunt", "code complete mcconnell"],
    },
];

/// Find the category whose detection keywords match the lowercased text
pub fn category_for(text: &str) -> Option<&'static CategoryRules> {
    let lower = text.to_lowercase();
    CATEGORIES
        .iter()
        .find(|c| c.detect.iter().any(|k| lower.contains(k)))
}

/// Vocabulary signalling a theoretical/principles reading intent
pub static THEORETICAL_TERMS: &[&str] = &[
    "principle",
    "principles",
    "internals",
    "design",
    "architecture",
    "theory",
    "foundations",
    "原理",
    "底层",
    "架构",
    "设计",
];

/// Vocabulary signalling a practical/tutorial reading intent
pub static PRACTICAL_TERMS: &[&str] = &[
    "tutorial",
    "hands-on",
    "practical",
    "cookbook",
    "beginner",
    "getting started",
    "in action",
    "实战",
    "入门",
    "教程",
];

/// Vocabulary signalling fiction intent in a raw query
pub static FICTION_INTENT_TERMS: &[&str] = &[
    "novel",
    "novels",
    "fiction",
    "story",
    "stories",
    "小说",
    "故事",
];

/// Generic modifiers that add noise rather than recall; fiction query
/// shaping drops them instead of passing them to providers
pub static GENERIC_MODIFIERS: &[&str] = &[
    "popular",
    "recommended",
    "classic",
    "classics",
    "best",
    "famous",
    "great",
    "top",
    "经典",
    "热门",
    "畅销",
];

/// Sub-genre vocabulary for fiction queries
#[derive(Debug, Clone, Copy)]
pub struct FictionGenre {
    pub id: &'static str,
    pub vocabulary: &'static [&'static str],
}

pub static FICTION_GENRES: &[FictionGenre] = &[
    FictionGenre {
        id: "science_fiction",
        vocabulary: &["science fiction", "sci-fi", "scifi", "科幻", "space opera"],
    },
    FictionGenre {
        id: "fantasy",
        vocabulary: &["fantasy", "奇幻", "魔幻", "dragon", "wizard"],
    },
    FictionGenre {
        id: "mystery",
        vocabulary: &["mystery", "detective", "crime", "推理", "悬疑", "侦探"],
    },
    FictionGenre {
        id: "romance",
        vocabulary: &["romance", "爱情", "言情"],
    },
    FictionGenre {
        id: "historical",
        vocabulary: &["historical fiction", "历史小说"],
    },
];

/// Curated fiction landmarks and authors; matches add a large bonus, with
/// commentary on them getting only a fraction
pub static FICTION_LANDMARKS: &[KnownWork] = &[
    KnownWork { title: "The Three-Body Problem", author: "Liu Cixin" },
    KnownWork { title: "三体", author: "刘慈欣" },
    KnownWork { title: "Dune", author: "Frank Herbert" },
    KnownWork { title: "Foundation", author: "Isaac Asimov" },
    KnownWork { title: "1984", author: "George Orwell" },
    KnownWork {
        title: "One Hundred Years of Solitude",
        author: "Gabriel García Márquez",
    },
    KnownWork { title: "百年孤独", author: "加西亚·马尔克斯" },
    KnownWork { title: "The Lord of the Rings", author: "J.R.R. Tolkien" },
    KnownWork { title: "Pride and Prejudice", author: "Jane Austen" },
    KnownWork { title: "红楼梦", author: "曹雪芹" },
    KnownWork { title: "活着", author: "余华" },
];

/// Evidence that a record is fiction at all, looked for in title and
/// category metadata
pub static FICTION_EVIDENCE_TERMS: &[&str] = &[
    "novel",
    "fiction",
    "story",
    "stories",
    "tale",
    "saga",
    "小说",
    "文学",
    "故事",
];

/// Vocabulary that marks a title as definitively non-fiction; fiction
/// queries hard-exclude these even when superficially keyword-matched
pub static NONFICTION_EXCLUDE_TERMS: &[&str] = &[
    "programming",
    "tutorial",
    "manual",
    "handbook",
    "reference",
    "textbook",
    "certification",
    "for dummies",
    "教程",
    "编程",
    "指南",
    "手册",
    "考试",
];

/// Vocabulary of commentary/analysis works about a book rather than the
/// book itself
pub static COMMENTARY_TERMS: &[&str] = &[
    "analysis of",
    "companion",
    "guide to",
    "study guide",
    "summary of",
    "critical essays",
    "赏析",
    "解读",
    "导读",
    "评论",
];

/// Vocabulary strongly associated with unrelated domains
pub static IRRELEVANT_TERMS: &[&str] = &[
    "marketing",
    "magazine",
    "periodical",
    "newsletter",
    "杂志",
    "期刊",
    "营销",
];

/// Vocabulary of low-quality aggregation artifacts
pub static LOW_QUALITY_TERMS: &[&str] = &[
    "omnibus",
    "digest",
    "collection of articles",
    "合集",
    "文摘",
    "大全集",
];

/// Stop words stripped during rule-based keyword extraction
pub static STOP_WORDS: &[&str] = &[
    "a", "an", "the", "i", "want", "to", "read", "book", "books", "about", "on", "of", "for",
    "some", "good", "best", "me", "find", "recommend", "please", "learn", "learning",
    "我", "想", "看", "找", "一本", "关于", "的", "书", "推荐", "请", "学习",
];

/// Multi-word domain compounds protected from being split apart by
/// stop-word stripping
pub static PROTECTED_COMPOUNDS: &[&str] = &[
    "machine learning",
    "deep learning",
    "operating system",
    "data structure",
    "computer network",
    "science fiction",
    "historical fiction",
    "software engineering",
    "neural network",
    "distributed systems",
];
