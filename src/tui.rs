use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::stdout;

use crate::codes::{self, CITIES};
use crate::export;
use crate::filter::Criteria;
use crate::geo::ALL_CITIES;
use crate::models::FarmerRecord;
use crate::paging;
use crate::registry::{Registry, RegistryView, ViewState};

const HELP: &str = " j/k:navigate  J/K:scroll  [/]:page  {/}:group  /:search  m:mail  \
                    x:clear  g:chart  c:city  q:quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pane {
    Farmers,
    Chart,
}

struct AppState<'a> {
    registry: &'a Registry,
    view_state: ViewState,
    page_size: usize,
    selected: usize,
    scroll_offset: u16,
    pane: Pane,
    /// Search prompt buffer while typing after `/`.
    input: Option<String>,
}

impl<'a> AppState<'a> {
    fn new(registry: &'a Registry, view_state: ViewState, page_size: usize) -> Self {
        Self {
            registry,
            view_state,
            page_size,
            selected: 0,
            scroll_offset: 0,
            pane: Pane::Farmers,
            input: None,
        }
    }

    fn view(&self) -> RegistryView<'a> {
        self.registry.view(&self.view_state, self.page_size)
    }

    fn current_farmer(&self) -> Option<&'a FarmerRecord> {
        self.view().page.items.get(self.selected).copied()
    }

    fn set_state(&mut self, view_state: ViewState) {
        self.view_state = view_state;
        self.selected = 0;
        self.scroll_offset = 0;
    }

    fn set_criteria(&mut self, criteria: Criteria) {
        let next = self.view_state.with_criteria(criteria);
        self.set_state(next);
    }

    fn goto_page(&mut self, page: i64) {
        let next = self.view_state.with_page(page);
        self.set_state(next);
    }

    fn next(&mut self) {
        let len = self.view().page.items.len();
        if len > 0 && self.selected < len - 1 {
            self.selected += 1;
            self.scroll_offset = 0;
        }
    }

    fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.scroll_offset = 0;
        }
    }

    fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(3);
    }

    fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(3);
    }

    fn page_step(&mut self, delta: i64) {
        let page = self.view().page.page as i64;
        self.goto_page(page + delta);
    }

    fn group_step(&mut self, forward: bool) {
        let view = self.view();
        let page = if forward {
            paging::next_group(view.page.page, view.page.total_pages)
        } else {
            paging::prev_group(view.page.page, view.page.total_pages)
        };
        self.goto_page(page as i64);
    }

    fn cycle_mail(&mut self) {
        let criteria = Criteria {
            mail_option: self.view_state.criteria.mail_option.next(),
            ..self.view_state.criteria.clone()
        };
        self.set_criteria(criteria);
    }

    fn cycle_city(&mut self) {
        let city = next_city(&self.view_state.selected_city);
        self.view_state = self.view_state.with_city(city);
    }

    fn submit_search(&mut self) {
        if let Some(term) = self.input.take() {
            let criteria = Criteria {
                search_term: term.trim().to_string(),
                ..self.view_state.criteria.clone()
            };
            self.set_criteria(criteria);
        }
    }

    /// Returns false when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.input.is_some() {
            match code {
                KeyCode::Enter => self.submit_search(),
                KeyCode::Esc => self.input = None,
                KeyCode::Backspace => {
                    if let Some(buffer) = self.input.as_mut() {
                        buffer.pop();
                    }
                }
                KeyCode::Char(c) => {
                    if let Some(buffer) = self.input.as_mut() {
                        buffer.push(c);
                    }
                }
                _ => {}
            }
            return true;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.prev(),
            KeyCode::Char('J') | KeyCode::PageDown => self.scroll_down(),
            KeyCode::Char('K') | KeyCode::PageUp => self.scroll_up(),
            KeyCode::Char(']') | KeyCode::Right => self.page_step(1),
            KeyCode::Char('[') | KeyCode::Left => self.page_step(-1),
            KeyCode::Char('}') => self.group_step(true),
            KeyCode::Char('{') => self.group_step(false),
            KeyCode::Char('m') => self.cycle_mail(),
            KeyCode::Char('/') => {
                self.input = Some(self.view_state.criteria.search_term.clone());
            }
            KeyCode::Char('x') => self.set_criteria(Criteria::default()),
            KeyCode::Char('g') => {
                self.pane = match self.pane {
                    Pane::Farmers => Pane::Chart,
                    Pane::Chart => Pane::Farmers,
                };
            }
            KeyCode::Char('c') => self.cycle_city(),
            _ => {}
        }
        true
    }
}

/// `all`, then each city in table order, then back to `all`.
fn next_city(current: &str) -> &'static str {
    match CITIES.iter().position(|c| *c == current) {
        None => CITIES[0],
        Some(i) if i + 1 < CITIES.len() => CITIES[i + 1],
        Some(_) => ALL_CITIES,
    }
}

pub fn run_browse(registry: &Registry, view_state: ViewState, page_size: usize) -> Result<()> {
    if registry.is_empty() {
        println!("No farmers registered.");
        return Ok(());
    }

    let mut state = AppState::new(registry, view_state, page_size);

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut state);

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
) -> Result<()> {
    let mut list_state = ListState::default();

    loop {
        list_state.select(Some(state.selected));
        terminal.draw(|frame| draw(frame, state, &mut list_state))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if !state.handle_key(key.code) {
                break;
            }
        }
    }
    Ok(())
}

fn draw(frame: &mut Frame, state: &AppState, list_state: &mut ListState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    match state.pane {
        Pane::Farmers => draw_farmers(frame, rows[0], state, list_state),
        Pane::Chart => draw_chart(frame, rows[0], state),
    }

    let footer = match &state.input {
        Some(buffer) => Paragraph::new(format!(" 검색: {}_  (Enter:apply Esc:cancel)", buffer))
            .style(Style::default().fg(Color::Yellow)),
        None => Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray)),
    };
    frame.render_widget(footer, rows[1]);
}

fn draw_farmers(frame: &mut Frame, area: Rect, state: &AppState, list_state: &mut ListState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    let view = state.view();
    let items: Vec<ListItem> = view
        .page
        .items
        .iter()
        .map(|farmer| {
            let mail = if farmer.can_receive_mail { "@" } else { " " };
            let region = farmer.region();
            let place = region
                .district
                .or(region.city)
                .unwrap_or_else(|| "?".to_string());
            ListItem::new(format!(
                "{} {} | {} | {}",
                mail,
                farmer.name,
                place,
                farmer.equipments.len()
            ))
        })
        .collect();

    let pages: Vec<String> = view
        .window
        .pages()
        .map(|p| {
            if p == view.page.page {
                format!("[{}]", p)
            } else {
                p.to_string()
            }
        })
        .collect();
    let title = format!(
        " 농가 {}/{} | {}{}{} ",
        view.total_matches,
        state.registry.len(),
        if view.window.has_prev_group() { "« " } else { "" },
        pages.join(" "),
        if view.window.has_next_group() { " »" } else { "" },
    );

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, chunks[0], list_state);

    let detail = build_detail(state.current_farmer(), &state.view_state.criteria);
    let detail_widget = Paragraph::new(detail)
        .block(Block::default().borders(Borders::ALL).title(" Detail "))
        .wrap(Wrap { trim: false })
        .scroll((state.scroll_offset, 0));

    frame.render_widget(detail_widget, chunks[1]);
}

fn draw_chart(frame: &mut Frame, area: Rect, state: &AppState) {
    let stats = state.registry.stats(&state.view_state);
    let scale = stats.scale();

    let mut chart = BarChart::default()
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .group_gap(1)
        .max(scale.y_axis_max);

    for (label, customers, equipment) in stats.rows() {
        let bars = [
            Bar::default()
                .value(customers)
                .style(Style::default().fg(Color::Green))
                .text_value(format!("농가 {}", customers)),
            Bar::default()
                .value(equipment)
                .style(Style::default().fg(Color::Yellow))
                .text_value(format!("장비 {}", equipment)),
        ];
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(label.to_string()))
                .bars(&bars),
        );
    }

    let place = if state.view_state.selected_city == ALL_CITIES {
        codes::PROVINCE
    } else {
        state.view_state.selected_city.as_str()
    };
    let loaded = state
        .registry
        .loaded_at()
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_default();
    let title = format!(
        " {} 지역별 농가/장비 | 축 0..{} 눈금 {} | {} ",
        place, scale.y_axis_max, scale.tick_step, loaded
    );

    if stats.is_empty() {
        let empty = Paragraph::new("위치를 알 수 있는 농가가 없습니다.")
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(empty, area);
    } else {
        frame.render_widget(
            chart.block(Block::default().borders(Borders::ALL).title(title)),
            area,
        );
    }
}

fn build_detail(farmer: Option<&FarmerRecord>, criteria: &Criteria) -> Text<'static> {
    let Some(farmer) = farmer else {
        return Text::raw(if criteria.is_empty() {
            "No farmer selected"
        } else {
            "No farmers match the current filters"
        });
    };

    let mut lines: Vec<Line> = Vec::new();
    let bold = Style::default().add_modifier(Modifier::BOLD);

    lines.push(Line::from(Span::styled(farmer.name.clone(), bold)));
    if !farmer.business_name.is_empty() {
        lines.push(Line::from(farmer.business_name.clone()));
    }
    lines.push(Line::from(""));

    let mut field = |label: &str, value: String| {
        if !value.is_empty() {
            lines.push(Line::from(vec![
                Span::styled(format!("{}: ", label), Style::default().fg(Color::Cyan)),
                Span::raw(value),
            ]));
        }
    };
    field("전화", farmer.phone.clone());
    field("지번", farmer.jibun_address.clone());
    field("도로명", farmer.road_address.clone());
    field("상세", farmer.address_detail.clone());
    field(
        "우편수신",
        if farmer.can_receive_mail { "예" } else { "아니오" }.to_string(),
    );
    field("연령대", farmer.age_group.clone());
    field("영농형태", export::farming_summary(farmer));
    field("주작물", export::crop_summary(farmer));
    field("평점", format!("{}/5", farmer.rating));
    field(
        "등록",
        farmer
            .created_at
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
    );

    if !farmer.equipments.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("보유장비 ({})", farmer.equipments.len()),
            bold,
        )));
        for e in &farmer.equipments {
            lines.push(Line::from(format!(
                "  {} {} {}  상태 {}/5",
                codes::EQUIPMENT_TYPES.label(&e.kind),
                codes::MANUFACTURERS.label(&e.manufacturer),
                e.model,
                e.condition
            )));
            if !e.trade_type.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!(
                        "    {} {} {}",
                        codes::TRADE_TYPES.label(&e.trade_type),
                        codes::SALE_STATUSES.label(e.sale_status.code()),
                        e.desired_price
                    ),
                    Style::default().fg(Color::Yellow),
                )));
            }
            for a in &e.attachments {
                lines.push(Line::from(format!(
                    "    + {} {}",
                    codes::ATTACHMENT_TYPES.label(&a.kind),
                    a.model
                )));
            }
        }
    }

    if !farmer.memo.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("메모", bold)));
        for line in farmer.memo.lines() {
            lines.push(Line::from(line.to_string()));
        }
    }

    Text::from(lines)
}
