use crate::{
    active_section::ActiveSectionTracker,
    browser::{self, BrowserIntersections, BrowserTimers, LocalStorage},
    config::SiteConfig,
    content::{self, CERTIFICATES, CONTACT_LINKS, PROFILE, PROJECTS, SKILL_GROUPS},
    hooks::{use_config, use_throttled, use_typewriter, use_visibility},
    mobile_nav::{MobileNav, NavSnapshot, RippleOrigin},
    parallax::{layer_offset, LayerOffset, MAX_LAYER_SHIFT},
    section::{PageComposition, SectionId},
    theme::{Theme, ThemeController},
};
use std::{cell::RefCell, rc::Rc};
use web_sys::{Element, MouseEvent};
use yew::prelude::*;

const CARD_STAGGER_MS: usize = 80;

/// Shared handle to the active-section tracker, handed to every section so it
/// can register its own element.
#[derive(Clone)]
struct SectionRegistry(Rc<RefCell<ActiveSectionTracker<BrowserIntersections, SectionId>>>);

impl PartialEq for SectionRegistry {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl SectionRegistry {
    fn register(&self, id: SectionId, element: &Element) {
        self.0.borrow_mut().register(id, element);
    }

    fn unregister(&self, id: SectionId) {
        self.0.borrow_mut().unregister(&id);
    }

    fn dispose(&self) {
        self.0.borrow_mut().dispose();
    }
}

fn on_section_link(on_select: &Callback<SectionId>, section: SectionId) -> Callback<MouseEvent> {
    let on_select = on_select.clone();
    Callback::from(move |event: MouseEvent| {
        event.prevent_default();
        on_select.emit(section);
    })
}

#[derive(Properties, PartialEq)]
struct SectionShellProps {
    id: SectionId,
    #[prop_or_default]
    class: Classes,
    #[prop_or_default]
    style: Option<AttrValue>,
    #[prop_or_default]
    onmousemove: Option<Callback<MouseEvent>>,
    #[prop_or_default]
    children: Html,
}

/// A page region: revealed once it scrolls into view and registered with the
/// active-section tracker while mounted.
#[function_component(SectionShell)]
fn section_shell(props: &SectionShellProps) -> Html {
    let config = use_config();
    let node = use_node_ref();
    let visible = use_visibility(node.clone(), config.reveal_options());
    let registry = use_context::<SectionRegistry>();

    {
        let node = node.clone();
        use_effect_with((props.id, registry), move |(id, registry)| {
            let id = *id;
            let registry = registry.clone();
            if let (Some(registry), Some(element)) = (registry.as_ref(), node.cast::<Element>()) {
                registry.register(id, &element);
            }
            move || {
                if let Some(registry) = registry {
                    registry.unregister(id);
                }
            }
        });
    }

    html! {
        <section
            id={props.id.anchor()}
            ref={node}
            class={classes!(
                "section",
                format!("section-{}", props.id.anchor()),
                visible.then_some("is-visible"),
                props.class.clone()
            )}
            style={props.style.clone()}
            onmousemove={props.onmousemove.clone()}
            aria-label={props.id.label()}
        >
            { props.children.clone() }
        </section>
    }
}

#[derive(Properties, PartialEq)]
struct RevealCardProps {
    index: usize,
    #[prop_or_default]
    class: Classes,
    #[prop_or_default]
    children: Html,
}

#[function_component(RevealCard)]
fn reveal_card(props: &RevealCardProps) -> Html {
    let config = use_config();
    let node = use_node_ref();
    let visible = use_visibility(node.clone(), config.reveal_options());
    let style = format!("--reveal-delay: {}ms;", props.index * CARD_STAGGER_MS);

    html! {
        <article
            ref={node}
            class={classes!("card", visible.then_some("is-visible"), props.class.clone())}
            style={style}
        >
            { props.children.clone() }
        </article>
    }
}

#[derive(Properties, PartialEq)]
struct HeaderProps {
    sections: Vec<SectionId>,
    active: SectionId,
    theme: Theme,
    on_toggle_theme: Callback<MouseEvent>,
}

#[function_component(Header)]
fn header(props: &HeaderProps) -> Html {
    let config = use_config();
    let snapshot = use_state_eq(NavSnapshot::default);
    let drawer = use_mut_ref(|| None::<MobileNav<BrowserTimers>>);

    {
        let snapshot = snapshot.clone();
        let drawer = drawer.clone();
        use_effect_with(config.nav, move |durations| {
            snapshot.set(NavSnapshot::default());
            let sink = snapshot.clone();
            *drawer.borrow_mut() = Some(MobileNav::new(
                BrowserTimers,
                *durations,
                Rc::new(move |next: NavSnapshot| sink.set(next)),
            ));
            move || {
                if let Some(nav) = drawer.borrow_mut().take() {
                    nav.dispose();
                }
            }
        });
    }

    let toggle_ref = use_node_ref();
    let on_menu_toggle = {
        let drawer = drawer.clone();
        let toggle_ref = toggle_ref.clone();
        Callback::from(move |event: MouseEvent| {
            let origin = toggle_ref
                .cast::<Element>()
                .map(|element| browser::element_center(&element))
                .unwrap_or(RippleOrigin {
                    x: f64::from(event.client_x()),
                    y: f64::from(event.client_y()),
                });
            if let Some(nav) = drawer.borrow().as_ref() {
                nav.toggle(origin);
            }
        })
    };

    let on_select = {
        let drawer = drawer.clone();
        Callback::from(move |section: SectionId| match drawer.borrow().as_ref() {
            Some(nav) => {
                nav.select_link(section, browser::scroll_to_section);
            }
            None => browser::scroll_to_section(section),
        })
    };

    let nav_links = |list_class: &'static str| {
        html! {
            <ul class={list_class}>
                { for props.sections.iter().map(|section| {
                    let section = *section;
                    let is_active = section == props.active;
                    html! {
                        <li key={section.anchor()}>
                            <a
                                href={section.href()}
                                class={classes!("nav-link", is_active.then_some("is-active"))}
                                aria-current={is_active.then_some("location")}
                                onclick={on_section_link(&on_select, section)}
                            >
                                {section.label()}
                            </a>
                        </li>
                    }
                }) }
            </ul>
        }
    };

    let switch = props.theme.switch();
    let drawer_state = snapshot.state;
    let drawer_style = snapshot.ripple.map(|origin| origin.css_vars()).unwrap_or_default();

    html! {
        <header class="site-header">
            <a class="brand" href={SectionId::Hero.href()} onclick={on_section_link(&on_select, SectionId::Hero)}>
                {PROFILE.name}
            </a>
            <nav class="site-nav" aria-label="Primary">
                { nav_links("nav-list") }
            </nav>
            <div class="header-actions">
                <button
                    class="theme-toggle"
                    type="button"
                    aria-label={switch.aria_label}
                    aria-pressed={switch.pressed.to_string()}
                    onclick={props.on_toggle_theme.clone()}
                >
                    <span aria-hidden="true">{switch.glyph}</span>
                </button>
                <button
                    ref={toggle_ref}
                    class={classes!("menu-toggle", drawer_state.is_open().then_some("is-open"))}
                    type="button"
                    aria-label="Toggle navigation"
                    aria-controls="mobile-drawer"
                    aria-expanded={drawer_state.is_open().to_string()}
                    onclick={on_menu_toggle}
                >
                    <span class="menu-bar" aria-hidden="true"></span>
                    <span class="menu-bar" aria-hidden="true"></span>
                    <span class="menu-bar" aria-hidden="true"></span>
                </button>
            </div>
            if drawer_state.is_rendered() {
                <div
                    id="mobile-drawer"
                    class={classes!("mobile-drawer", format!("is-{}", drawer_state.as_str()))}
                    style={drawer_style}
                    aria-hidden={(!drawer_state.is_open()).to_string()}
                >
                    <nav aria-label="Mobile">
                        { nav_links("drawer-list") }
                    </nav>
                </div>
            }
        </header>
    }
}

#[function_component(Hero)]
fn hero() -> Html {
    let config = use_config();
    let typed = use_typewriter(AttrValue::from(PROFILE.name), config.typewriter);
    let offset = use_state_eq(LayerOffset::default);

    let on_pointer = {
        let offset = offset.clone();
        use_callback((), move |(x, y): (i32, i32), _| {
            offset.set(layer_offset(
                f64::from(x),
                f64::from(y),
                browser::viewport(),
                MAX_LAYER_SHIFT,
            ));
        })
    };
    let throttled = use_throttled(config.pointer_throttle_ms, on_pointer);
    let onmousemove = Callback::from(move |event: MouseEvent| {
        throttled.emit((event.client_x(), event.client_y()));
    });

    let on_jump = Callback::from(browser::scroll_to_section);

    html! {
        <SectionShell
            id={SectionId::Hero}
            class="hero"
            style={AttrValue::from(offset.css_vars())}
            onmousemove={onmousemove}
        >
            <div class="hero-backdrop" aria-hidden="true"></div>
            <div class="hero-copy">
                <p class="hero-greeting">{"Hi, I'm"}</p>
                <h1 class="hero-name" aria-label={PROFILE.name}>
                    <span aria-hidden="true">{typed}</span>
                    <span class="typing-cursor" aria-hidden="true">{"|"}</span>
                </h1>
                <p class="hero-role">{PROFILE.role}</p>
                <p class="hero-tagline muted">{PROFILE.tagline}</p>
                <div class="hero-actions">
                    <a class="button" href={SectionId::Projects.href()} onclick={on_section_link(&on_jump, SectionId::Projects)}>
                        {"View projects"}
                    </a>
                    <a class="button button-ghost" href={SectionId::Contact.href()} onclick={on_section_link(&on_jump, SectionId::Contact)}>
                        {"Get in touch"}
                    </a>
                </div>
            </div>
        </SectionShell>
    }
}

#[function_component(About)]
fn about() -> Html {
    html! {
        <SectionShell id={SectionId::About}>
            <h2>{"About"}</h2>
            { for PROFILE.bio.iter().map(|paragraph| html! { <p>{*paragraph}</p> }) }
            <a class="link" href={PROFILE.resume_href} target="_blank" rel="noopener noreferrer">
                {"Resume"}
                <span class="external-mark" aria-hidden="true">{"↗"}</span>
                <span class="sr-only">{" (opens in a new tab)"}</span>
            </a>
        </SectionShell>
    }
}

#[function_component(Skills)]
fn skills() -> Html {
    html! {
        <SectionShell id={SectionId::Skills}>
            <h2>{"Skills"}</h2>
            <div class="card-grid">
                { for SKILL_GROUPS.iter().enumerate().map(|(index, group)| html! {
                    <RevealCard key={group.title} index={index}>
                        <h3>{group.title}</h3>
                        <ul class="chip-list">
                            { for group.skills.iter().map(|skill| html! { <li class="chip">{*skill}</li> }) }
                        </ul>
                    </RevealCard>
                }) }
            </div>
        </SectionShell>
    }
}

fn project_card(index: usize, project: &content::Project) -> Html {
    html! {
        <RevealCard key={project.title} index={index} class="project-card">
            <h3>
                if let Some(href) = project.href {
                    <a class="link" href={href} target="_blank" rel="noopener noreferrer">
                        {project.title}
                        <span class="external-mark" aria-hidden="true">{"↗"}</span>
                    </a>
                } else {
                    {project.title}
                }
            </h3>
            <p class="muted">{project.summary}</p>
            <ul class="chip-list">
                { for project.stack.iter().map(|item| html! { <li class="chip">{*item}</li> }) }
            </ul>
        </RevealCard>
    }
}

#[function_component(Projects)]
fn projects() -> Html {
    html! {
        <SectionShell id={SectionId::Projects}>
            <h2>{"Projects"}</h2>
            <div class="card-grid">
                { for PROJECTS.iter().enumerate().map(|(index, project)| project_card(index, project)) }
            </div>
        </SectionShell>
    }
}

#[function_component(Certificates)]
fn certificates() -> Html {
    html! {
        <SectionShell id={SectionId::Certificates}>
            <h2>{"Certificates"}</h2>
            <div class="card-grid">
                { for CERTIFICATES.iter().enumerate().map(|(index, certificate)| html! {
                    <RevealCard key={certificate.title} index={index}>
                        <h3>{certificate.title}</h3>
                        <p class="muted">{format!("{} · {}", certificate.issuer, certificate.year)}</p>
                    </RevealCard>
                }) }
            </div>
        </SectionShell>
    }
}

#[function_component(Contact)]
fn contact() -> Html {
    html! {
        <SectionShell id={SectionId::Contact}>
            <h2>{"Contact"}</h2>
            <ul class="row-list">
                { for CONTACT_LINKS.iter().map(|link| html! {
                    <li key={link.label}>
                        if link.external {
                            <a class="link" href={link.href} target="_blank" rel="noopener noreferrer">
                                {link.label}
                                <span class="external-mark" aria-hidden="true">{"↗"}</span>
                                <span class="sr-only">{" (opens in a new tab)"}</span>
                            </a>
                        } else {
                            <a class="link" href={link.href}>{link.label}</a>
                        }
                    </li>
                }) }
            </ul>
        </SectionShell>
    }
}

/// Section renderers, resolved by the composition root.
fn render_section(section: SectionId) -> Html {
    match section {
        SectionId::Hero => html! { <Hero key={section.anchor()} /> },
        SectionId::About => html! { <About key={section.anchor()} /> },
        SectionId::Skills => html! { <Skills key={section.anchor()} /> },
        SectionId::Projects => html! { <Projects key={section.anchor()} /> },
        SectionId::Certificates => html! { <Certificates key={section.anchor()} /> },
        SectionId::Contact => html! { <Contact key={section.anchor()} /> },
    }
}

#[derive(Properties, PartialEq)]
struct AppProps {
    config: Rc<SiteConfig>,
}

#[function_component(App)]
fn app(props: &AppProps) -> Html {
    let controller = use_mut_ref(|| {
        ThemeController::resolve(LocalStorage, browser::system_prefers_dark())
    });
    let theme = use_state_eq(|| controller.borrow().theme());
    let composition = use_state(PageComposition::default);
    let active = use_state_eq(|| composition.default_active());

    let registry = {
        let active = active.clone();
        let initial = composition.default_active();
        use_memo((), move |_| {
            SectionRegistry(Rc::new(RefCell::new(ActiveSectionTracker::new(
                BrowserIntersections,
                initial,
                Rc::new(move |section: SectionId| active.set(section)),
            ))))
        })
    };

    {
        let current = *theme;
        use_effect_with((), move |_| {
            browser::apply_theme(current);
            || ()
        });
    }

    {
        let composition = composition.clone();
        use_effect_with((), move |_| {
            let mut ready = (*composition).clone();
            ready.mark_ready();
            log::debug!("deferred sections released: {}", ready.deferred().len());
            composition.set(ready);
            || ()
        });
    }

    {
        let registry = (*registry).clone();
        use_effect_with((), move |_| move || registry.dispose());
    }

    let on_toggle_theme = {
        let theme = theme.clone();
        let controller = controller.clone();
        Callback::from(move |_: MouseEvent| {
            let next = controller.borrow_mut().toggle();
            browser::apply_theme_with_transition(next);
            theme.set(next);
        })
    };

    html! {
        <ContextProvider<Rc<SiteConfig>> context={props.config.clone()}>
            <ContextProvider<SectionRegistry> context={(*registry).clone()}>
                <a class="skip-link" href="#content">{"Skip to main content"}</a>
                <Header
                    sections={composition.sections().to_vec()}
                    active={*active}
                    theme={*theme}
                    on_toggle_theme={on_toggle_theme}
                />
                <main id="content">
                    { for composition.mounted().iter().map(|section| render_section(*section)) }
                </main>
                <footer class="site-footer">
                    <p class="muted">{PROFILE.name}</p>
                </footer>
            </ContextProvider<SectionRegistry>>
        </ContextProvider<Rc<SiteConfig>>>
    }
}

pub fn run() {
    wasm_logger::init(wasm_logger::Config::new(log::Level::Debug));
    console_error_panic_hook::set_once();

    let config = SiteConfig::load(browser::config_source().as_deref());
    log::set_max_level(config.log_level.to_level().to_level_filter());
    log::info!("mounting portfolio (log level {})", config.log_level.as_str());

    let root = match browser::mount_point() {
        Ok(root) => root,
        Err(error) => {
            log::error!("{error}; nothing rendered");
            return;
        }
    };
    yew::Renderer::<App>::with_root_and_props(
        root,
        AppProps {
            config: Rc::new(config),
        },
    )
    .render();
}
