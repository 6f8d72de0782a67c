use iced::widget::{button, column, container, progress_bar, row, scrollable, text, text_input, Column, Row, Space};
use iced::{Alignment, Background, Border, Color, Element, Length, Shadow, Subscription, Task, Theme, Vector};
use std::time::Duration;

use pim_dash::ambient::{AmbientProbe, SystemProbe};
use pim_dash::config::DashboardConfig;
use pim_dash::metrics::{self, DailyScore, Direction, Kpi};
use pim_dash::store::PreferenceStore;
use pim_dash::worklist::{self, FilterState, TaskRecord, TaskStatus, Worklist};
use pim_dash::{demo, DisplayPreference, PreferenceResolver, ThemeLifecycle};

use crate::theme::{build_palette, status_badge, Palette, CHANNEL_COLORS};

// ─── MESSAGE ────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Message {
    SearchChanged(String),
    ToggleStatus(TaskStatus),
    ClearFilter,
    SelectTask(String),
    CopyWorklist,
    ToggleTheme,
    AmbientTick,
}

// ─── APP STATE ──────────────────────────────────────────────────

pub struct Dashboard {
    config: DashboardConfig,
    theme: PreferenceResolver<Box<dyn PreferenceStore>>,
    series: Vec<DailyScore>,
    kpis: Vec<Kpi>,
    worklist: Worklist,
    filter: FilterState,
    /// Id of the task whose detail panel is open.
    selected: Option<String>,
    status_message: Option<String>,
}

impl Dashboard {
    /// Resolves the theme before returning, so the first `view` call
    /// already sees `ThemeLifecycle::Resolved`.
    pub fn new(config: DashboardConfig) -> Self {
        let mut theme = PreferenceResolver::new(config.open_store());
        let pref = theme.resolve(&SystemProbe);
        tracing::info!(theme = %pref, store = ?config.store, "dashboard starting");

        let series = demo::quality_trend().unwrap_or_else(|e| {
            tracing::warn!("quality trend unavailable: {e}");
            Vec::new()
        });
        let kpis = metrics::kpis(&series, demo::FIXED_KPIS).unwrap_or_else(|e| {
            tracing::warn!("kpi strip unavailable: {e}");
            Vec::new()
        });
        let worklist = demo::worklist().unwrap_or_else(|e| {
            tracing::warn!("rejected worklist data: {e}");
            Worklist::default()
        });

        Self {
            config,
            theme,
            series,
            kpis,
            worklist,
            filter: FilterState::default(),
            selected: None,
            status_message: None,
        }
    }

    pub fn title(&self) -> String {
        String::from("Automotive PIM")
    }

    pub fn theme(&self) -> Theme {
        match self.theme.lifecycle() {
            ThemeLifecycle::Resolved(DisplayPreference::Light) => Theme::Light,
            // Unresolved never reaches a frame: new() resolves first
            ThemeLifecycle::Resolved(DisplayPreference::Dark) | ThemeLifecycle::Unresolved => Theme::Dark,
        }
    }

    pub fn subscription(&self) -> Subscription<Message> {
        if self.config.ambient_poll_secs == 0 {
            return Subscription::none();
        }
        iced::time::every(Duration::from_secs(self.config.ambient_poll_secs)).map(|_| Message::AmbientTick)
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SearchChanged(s) => {
                self.filter.set_search(self.config.clamp_search(s));
            }
            Message::ToggleStatus(status) => self.filter.toggle_status(status),
            Message::ClearFilter => self.filter.clear(),
            Message::SelectTask(id) => {
                self.selected = if self.selected.as_deref() == Some(id.as_str()) { None } else { Some(id) };
            }
            Message::CopyWorklist => {
                let visible = self.worklist.filtered(&self.filter);
                let count = visible.len();
                let contents = worklist::clipboard_text(&visible);
                self.status_message = Some(format!("{count} Einträge in die Zwischenablage kopiert"));
                return iced::clipboard::write(contents);
            }
            Message::ToggleTheme => {
                let pref = self.theme.toggle();
                tracing::info!(theme = %pref, "theme toggled");
            }
            Message::AmbientTick => {
                if let Some(pref) = self.theme.on_ambient_change(SystemProbe.prefers_dark()) {
                    tracing::info!(theme = %pref, "following system theme");
                }
            }
        }
        Task::none()
    }

    // ─── MAIN VIEW ──────────────────────────────────────────────

    pub fn view(&self) -> Element<'_, Message> {
        let ThemeLifecycle::Resolved(pref) = *self.theme.lifecycle() else {
            return Space::new(Length::Fill, Length::Fill).into();
        };
        let p = build_palette(pref);
        let bg = p.bg;

        let mut body = column![
            self.view_topbar(pref, &p),
            self.view_kpis(&p),
            row![self.view_quality_trend(&p), self.view_coverage(&p)].spacing(12),
            self.view_worklist(&p),
        ]
        .spacing(12)
        .padding(12);

        if let Some(task) = self.selected_task() {
            body = body.push(view_task_detail(task, &p));
        }
        body = body.push(row![view_channel_share(&p), view_activity(&p)].spacing(12));
        if let Some(msg) = &self.status_message {
            body = body.push(text(msg.clone()).size(11).color(p.label));
        }

        container(scrollable(body))
            .width(Length::Fill)
            .height(Length::Fill)
            .style(move |_: &Theme| container::Style {
                background: Some(Background::Color(bg)),
                ..Default::default()
            })
            .into()
    }

    fn selected_task(&self) -> Option<&TaskRecord> {
        let id = self.selected.as_deref()?;
        self.worklist.records().iter().find(|r| r.id == id)
    }

    fn view_topbar(&self, pref: DisplayPreference, p: &Palette) -> Element<'_, Message> {
        let topbar_bg = p.topbar_bg;
        let border_c = p.border;
        let toggle_label = if pref.is_dark() { "Hell" } else { "Dunkel" };

        let brand = column![
            text("Automotive PIM").size(16).color(p.text),
            text("KI-Validierung · Multi-Tenant · API-first").size(11).color(p.label),
        ]
        .spacing(2);

        let search = text_input("Suche Produkte, Fahrzeuge, Medien…", &self.filter.search_text)
            .on_input(Message::SearchChanged)
            .width(Length::Fixed(420.0));

        let content = row![
            brand,
            Space::with_width(16),
            search,
            Space::with_width(Length::Fill),
            button(text(toggle_label).size(12))
                .on_press(Message::ToggleTheme)
                .style(button::secondary)
                .padding([4, 12]),
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        container(content)
            .width(Length::Fill)
            .padding([8, 12])
            .style(move |_: &Theme| container::Style {
                background: Some(Background::Color(topbar_bg)),
                border: Border { color: border_c, width: 1.0, radius: 12.0.into() },
                ..Default::default()
            })
            .into()
    }

    fn view_kpis(&self, p: &Palette) -> Element<'_, Message> {
        let tiles: Vec<Element<Message>> = self
            .kpis
            .iter()
            .map(|kpi| {
                panel(
                    column![
                        text(kpi.title).size(11).color(p.label),
                        text(kpi.value.clone()).size(26).color(p.text),
                        text(kpi.sub.clone()).size(11).color(p.label),
                    ]
                    .spacing(4)
                    .into(),
                    p,
                )
            })
            .collect();
        Row::with_children(tiles).spacing(12).into()
    }

    fn view_quality_trend(&self, p: &Palette) -> Element<'_, Message> {
        let trend_color = match metrics::trend(&self.series).map(|t| t.direction) {
            Ok(Direction::Up) => p.positive,
            Ok(Direction::Down) => p.negative,
            Ok(Direction::Flat) | Err(_) => p.label,
        };
        let mut rows = vec![section_title("Datenqualität · letzte 7 Tage", p)];
        rows.extend(
            self.series
                .iter()
                .map(|s| labeled_bar(s.label(), s.value(), p.accent, p)),
        );
        if let Ok(avg) = metrics::average(&self.series) {
            rows.push(text(format!("Ø {avg}%")).size(12).color(trend_color).into());
        }
        panel(Column::with_children(rows).spacing(6).into(), p)
    }

    fn view_coverage(&self, p: &Palette) -> Element<'_, Message> {
        let mut rows = vec![section_title("Abdeckung nach Region", p)];
        rows.extend(
            demo::COVERAGE
                .iter()
                .map(|&(region, value)| labeled_bar(region, value, p.accent_alt, p)),
        );
        panel(Column::with_children(rows).spacing(6).into(), p)
    }

    // ─── WORKLIST ───────────────────────────────────────────────

    fn view_worklist(&self, p: &Palette) -> Element<'_, Message> {
        let visible = self.worklist.filtered(&self.filter);
        let accent = p.accent;
        let label_c = p.label;

        let mut controls: Vec<Element<Message>> = vec![
            section_title("Arbeitsliste", p),
            text(format!("{} / {}", visible.len(), self.worklist.len())).size(11).color(label_c).into(),
            Space::with_width(Length::Fill).into(),
        ];
        for (status, count) in worklist::status_counts(self.worklist.records()) {
            let active = self.filter.active_statuses.contains(&status);
            controls.push(filter_chip(format!("{status} ({count})"), status, active, accent, label_c));
        }
        controls.push(
            button(text("Zurücksetzen").size(11))
                .on_press_maybe((!self.filter.is_unfiltered()).then_some(Message::ClearFilter))
                .style(button::text)
                .padding([3, 8])
                .into(),
        );
        controls.push(
            button(text("In Clipboard").size(11))
                .on_press(Message::CopyWorklist)
                .style(button::secondary)
                .padding([3, 10])
                .into(),
        );
        let header = Row::with_children(controls).spacing(6).align_y(Alignment::Center);

        let mut rows: Vec<Element<Message>> = vec![header.into()];
        if visible.is_empty() {
            rows.push(
                container(text(self.empty_worklist_hint()).size(12).color(label_c))
                    .padding([12, 0])
                    .into(),
            );
        }
        for (i, task) in visible.into_iter().enumerate() {
            let row_bg = if i % 2 == 0 { p.panel_bg } else { p.bg };
            let selected = self.selected.as_deref() == Some(task.id.as_str());
            rows.push(task_row(task, row_bg, selected, p));
        }

        panel(Column::with_children(rows).spacing(4).into(), p)
    }

    fn empty_worklist_hint(&self) -> &'static str {
        if self.worklist.is_empty() {
            "Keine Aufgaben vorhanden"
        } else {
            "Keine Treffer für den aktuellen Filter"
        }
    }
}

// ─── HELPERS ────────────────────────────────────────────────────

fn task_row<'a>(task: &'a TaskRecord, row_bg: Color, selected: bool, p: &Palette) -> Element<'a, Message> {
    let accent = p.accent;
    let text_c = p.text;
    let border_c = if selected { accent } else { Color::TRANSPARENT };
    let content = row![
        text(&task.id).size(11).color(p.label).width(Length::Fixed(80.0)),
        button(text(&task.title).size(12).color(text_c))
            .on_press(Message::SelectTask(task.id.clone()))
            .style(button::text)
            .width(Length::Fill),
        status_pill(task.status),
        row![
            themed_bar(f32::from(task.quality_score), accent, p.bar_bg),
            text(format!("{}%", task.quality_score)).size(11).color(text_c).width(Length::Fixed(36.0)),
        ]
        .spacing(6)
        .align_y(Alignment::Center)
        .width(Length::Fixed(160.0)),
    ]
    .spacing(10)
    .align_y(Alignment::Center);

    container(content)
        .width(Length::Fill)
        .padding([4, 8])
        .style(move |_: &Theme| container::Style {
            background: Some(Background::Color(row_bg)),
            border: Border { color: border_c, width: 1.0, radius: 6.0.into() },
            ..Default::default()
        })
        .into()
}

fn view_task_detail<'a>(task: &'a TaskRecord, p: &Palette) -> Element<'a, Message> {
    panel(
        column![
            section_title("Details", p),
            text(&task.title).size(16).color(p.text),
            row![
                text(&task.id).size(11).color(p.label),
                status_pill(task.status),
            ]
            .spacing(8)
            .align_y(Alignment::Center),
            labeled_bar("DQ", task.quality_score, p.accent, p),
            button(text("Schließen").size(11))
                .on_press(Message::SelectTask(task.id.clone()))
                .style(button::secondary)
                .padding([3, 10]),
        ]
        .spacing(8)
        .into(),
        p,
    )
}

fn view_channel_share(p: &Palette) -> Element<'static, Message> {
    let mut rows = vec![section_title("Exportanteil nach Kanal", p)];
    rows.extend(
        demo::CHANNEL_SHARE
            .iter()
            .zip(CHANNEL_COLORS.iter().cycle())
            .map(|(&(channel, share), &color)| labeled_bar(channel, share, color, p)),
    );
    panel(Column::with_children(rows).spacing(6).into(), p)
}

fn view_activity(p: &Palette) -> Element<'static, Message> {
    let mut rows = vec![section_title("Letzte Aktivitäten", p)];
    for &(title, detail, when) in demo::ACTIVITY {
        rows.push(
            row![
                column![
                    text(title).size(12).color(p.text),
                    text(detail).size(11).color(p.label),
                ]
                .spacing(2),
                Space::with_width(Length::Fill),
                text(when).size(11).color(p.label),
            ]
            .align_y(Alignment::Center)
            .into(),
        );
    }
    panel(Column::with_children(rows).spacing(8).into(), p)
}

fn status_pill(status: TaskStatus) -> Element<'static, Message> {
    let (bg, fg) = status_badge(status);
    container(text(status.label()).size(11).color(fg))
        .padding([2, 8])
        .style(move |_: &Theme| container::Style {
            background: Some(Background::Color(bg)),
            border: Border { color: Color::TRANSPARENT, width: 0.0, radius: 8.0.into() },
            ..Default::default()
        })
        .into()
}

fn filter_chip(label: String, status: TaskStatus, active: bool, accent: Color, label_c: Color) -> Element<'static, Message> {
    let color = if active { accent } else { label_c };
    let fill = if active { Color::from_rgba(accent.r, accent.g, accent.b, 0.12) } else { Color::TRANSPARENT };
    button(text(label).size(11).color(color))
        .on_press(Message::ToggleStatus(status))
        .padding([3, 10])
        .style(move |_: &Theme, btn_status| {
            let bg = match btn_status {
                button::Status::Hovered => Color::from_rgba(accent.r, accent.g, accent.b, 0.18),
                button::Status::Pressed => Color::from_rgba(accent.r, accent.g, accent.b, 0.25),
                _ => fill,
            };
            button::Style {
                background: Some(Background::Color(bg)),
                text_color: color,
                border: Border { color, width: 1.0, radius: 10.0.into() },
                ..Default::default()
            }
        })
        .into()
}

fn themed_bar(value: f32, color: Color, bar_bg: Color) -> Element<'static, Message> {
    progress_bar(0.0..=100.0, value)
        .width(Length::Fill)
        .height(Length::Fixed(8.0))
        .style(move |_: &Theme| progress_bar::Style {
            background: Background::Color(bar_bg),
            bar: Background::Color(color),
            border: Border { color: Color::TRANSPARENT, width: 0.0, radius: 4.0.into() },
        })
        .into()
}

fn labeled_bar(label: &str, value: u8, color: Color, p: &Palette) -> Element<'static, Message> {
    row![
        text(label.to_owned()).size(11).color(p.label).width(Length::Fixed(72.0)),
        themed_bar(f32::from(value), color, p.bar_bg),
        text(format!("{value}%")).size(11).color(p.text).width(Length::Fixed(40.0)),
    ]
    .spacing(6)
    .align_y(Alignment::Center)
    .into()
}

fn section_title(label: &str, p: &Palette) -> Element<'static, Message> {
    text(label.to_owned()).size(12).color(p.accent).into()
}

fn panel<'a>(content: Element<'a, Message>, p: &Palette) -> Element<'a, Message> {
    let panel_bg = p.panel_bg;
    let border_c = p.border;
    container(content)
        .width(Length::Fill)
        .padding(12)
        .style(move |_: &Theme| container::Style {
            background: Some(Background::Color(panel_bg)),
            border: Border {
                color: border_c,
                width: 1.0,
                radius: 16.0.into(),
            },
            shadow: Shadow {
                color: Color::from_rgba(0.0, 0.0, 0.0, 0.12),
                offset: Vector::new(0.0, 2.0),
                blur_radius: 8.0,
            },
            ..Default::default()
        })
        .into()
}
