//! Static page content. The animation and navigation code never looks inside
//! these records; they only feed the section renderers.

pub struct Profile {
    pub name: &'static str,
    pub role: &'static str,
    pub tagline: &'static str,
    pub bio: &'static [&'static str],
    pub resume_href: &'static str,
}

pub struct SkillGroup {
    pub title: &'static str,
    pub skills: &'static [&'static str],
}

pub struct Project {
    pub title: &'static str,
    pub summary: &'static str,
    pub stack: &'static [&'static str],
    pub href: Option<&'static str>,
}

pub struct Certificate {
    pub title: &'static str,
    pub issuer: &'static str,
    pub year: u16,
}

pub struct ContactLink {
    pub label: &'static str,
    pub href: &'static str,
    pub external: bool,
}

pub const PROFILE: Profile = Profile {
    name: "Jordan Avery",
    role: "Software Engineer",
    tagline: "Building reliable systems and friendly interfaces.",
    bio: &[
        "I design and build software end to end, from storage engines and network services to the interfaces people touch every day.",
        "Lately I have been focused on Rust, WebAssembly and tooling that makes teams faster without making systems fragile.",
    ],
    resume_href: "/resume.pdf",
};

pub const SKILL_GROUPS: &[SkillGroup] = &[
    SkillGroup {
        title: "Languages",
        skills: &["Rust", "TypeScript", "Python", "Go", "SQL"],
    },
    SkillGroup {
        title: "Web",
        skills: &["WebAssembly", "Yew", "React", "HTML", "CSS"],
    },
    SkillGroup {
        title: "Infrastructure",
        skills: &["Linux", "Docker", "PostgreSQL", "GitHub Actions"],
    },
];

pub const PROJECTS: &[Project] = &[
    Project {
        title: "Ledgerline",
        summary: "Append-only event store with snapshotting and point-in-time replay.",
        stack: &["Rust", "tokio", "PostgreSQL"],
        href: Some("https://github.com/"),
    },
    Project {
        title: "Quillboard",
        summary: "Collaborative markdown board with offline sync.",
        stack: &["TypeScript", "CRDT", "WebSocket"],
        href: Some("https://github.com/"),
    },
    Project {
        title: "Trailhead",
        summary: "CLI that scaffolds and audits service repositories.",
        stack: &["Rust", "clap"],
        href: None,
    },
];

pub const CERTIFICATES: &[Certificate] = &[
    Certificate {
        title: "Certified Kubernetes Application Developer",
        issuer: "CNCF",
        year: 2024,
    },
    Certificate {
        title: "AWS Certified Developer - Associate",
        issuer: "Amazon Web Services",
        year: 2023,
    },
];

pub const CONTACT_LINKS: &[ContactLink] = &[
    ContactLink {
        label: "Email",
        href: "mailto:hello@example.com",
        external: false,
    },
    ContactLink {
        label: "GitHub",
        href: "https://github.com/",
        external: true,
    },
    ContactLink {
        label: "LinkedIn",
        href: "https://www.linkedin.com/",
        external: true,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_titles_are_unique() {
        let mut titles: Vec<_> = PROJECTS.iter().map(|project| project.title).collect();
        titles.sort_unstable();
        titles.dedup();
        assert_eq!(titles.len(), PROJECTS.len());
    }

    #[test]
    fn external_contacts_use_https() {
        for link in CONTACT_LINKS.iter().filter(|link| link.external) {
            assert!(link.href.starts_with("https://"), "{}", link.label);
        }
    }
}
