//! Page sections and the order the composition root mounts them in.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionId {
    Hero,
    About,
    Skills,
    Projects,
    Certificates,
    Contact,
}

impl SectionId {
    pub const ALL: [SectionId; 6] = [
        Self::Hero,
        Self::About,
        Self::Skills,
        Self::Projects,
        Self::Certificates,
        Self::Contact,
    ];

    pub fn anchor(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::About => "about",
            Self::Skills => "skills",
            Self::Projects => "projects",
            Self::Certificates => "certificates",
            Self::Contact => "contact",
        }
    }

    pub fn href(self) -> String {
        format!("#{}", self.anchor())
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Hero => "Home",
            Self::About => "About",
            Self::Skills => "Skills",
            Self::Projects => "Projects",
            Self::Certificates => "Certificates",
            Self::Contact => "Contact",
        }
    }

    pub fn from_anchor(value: &str) -> Option<Self> {
        let value = value.strip_prefix('#').unwrap_or(value);
        Self::ALL
            .into_iter()
            .find(|section| section.anchor() == value)
    }
}

/// Ordered sections plus the flag that releases deferred ones for rendering.
///
/// Everything after the first section waits for [`PageComposition::mark_ready`],
/// which the root calls once the first paint has committed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageComposition {
    order: Vec<SectionId>,
    ready: bool,
}

impl Default for PageComposition {
    fn default() -> Self {
        Self::new(SectionId::ALL.to_vec())
    }
}

impl PageComposition {
    pub fn new(mut order: Vec<SectionId>) -> Self {
        let mut seen = Vec::with_capacity(order.len());
        order.retain(|section| {
            let fresh = !seen.contains(section);
            seen.push(*section);
            fresh
        });
        if order.is_empty() {
            order.push(SectionId::Hero);
        }

        Self {
            order,
            ready: false,
        }
    }

    pub fn sections(&self) -> &[SectionId] {
        &self.order
    }

    /// Active section before any observation fires.
    pub fn default_active(&self) -> SectionId {
        self.order[0]
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn mark_ready(&mut self) {
        self.ready = true;
    }

    /// Sections the page renders right now.
    pub fn mounted(&self) -> &[SectionId] {
        if self.ready {
            &self.order
        } else {
            &self.order[..1]
        }
    }

    pub fn deferred(&self) -> &[SectionId] {
        &self.order[1..]
    }
}
