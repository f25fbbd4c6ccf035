//! Screen rendering
//!
//! Pure functions from app state to widgets. List selections are
//! rebuilt per frame; nothing here mutates the app.

use ratatui::{prelude::*, widgets::*};
use tui_input::Input;
use tui_logger::{TuiLoggerLevelOutput, TuiLoggerWidget};

use shared::currency::{format_currency, format_currency_decimal, format_phone};
use shared::cuisine::CUISINE_FILTERS;
use shared::models::{MenuItem, OrderStatus, Restaurant, humanize_status};

use super::{App, FEATURED_COUNT, InputMode, Modal, Route};
use crate::views::ViewState;

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(f.area());

    draw_header(f, app, chunks[0]);

    let body = if app.show_logs {
        let split = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(chunks[1]);
        draw_logs(f, app, split[1]);
        split[0]
    } else {
        chunks[1]
    };

    match app.route {
        Route::Home => draw_home(f, app, body),
        Route::Restaurants => draw_restaurants(f, app, body),
        Route::RestaurantDetail => draw_menu(f, app, body),
        Route::Cart => draw_cart(f, app, body),
        Route::Checkout => draw_checkout(f, app, body),
        Route::Orders => draw_orders(f, app, body),
        Route::Tracking => draw_tracking(f, app, body),
        Route::Profile => draw_profile(f, app, body),
        Route::Auth => draw_auth(f, app, body),
    }

    draw_footer(f, app, chunks[2]);

    if let Modal::ReplaceCart { current, .. } = &app.modal {
        draw_replace_modal(f, current);
    }
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let account = match &app.session {
        Some(session) => Span::styled(
            session.user.email.clone(),
            Style::default().fg(Color::Green),
        ),
        None => Span::styled("signed out", Style::default().fg(Color::DarkGray)),
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " FoodieHub ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("| "),
        Span::raw(app.route.title()),
        Span::raw(" | "),
        Span::styled(
            format!(
                "Cart: {} items ({})",
                app.cart.item_count(),
                format_currency(app.cart.total())
            ),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(" | "),
        account,
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(header, area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let hint = match (app.route, app.input_mode) {
        (Route::Checkout, InputMode::Editing) => {
            "Tab next field | Up/Down suggestions | Enter pick/submit | Esc done"
        }
        (Route::Auth, InputMode::Editing) => {
            "Tab switch field | F2 sign in/up | Enter submit | Esc cancel"
        }
        (Route::Profile, InputMode::Editing) => "Tab next field | Enter save | Esc cancel",
        (_, InputMode::Editing) => "Type to search | Enter done | Esc cancel",
        (Route::Home, _) => {
            "Up/Down featured | Left/Right cuisine | Enter open | r browse | / search | c cart | o orders | p profile | q quit"
        }
        (Route::Restaurants, _) => "Up/Down move | Enter open | / search | f cuisine | s sort | Esc back",
        (Route::RestaurantDetail, _) => "Left/Right category | Up/Down move | Enter add | c cart | Esc back",
        (Route::Cart, _) => "Up/Down move | +/- quantity | x remove | X clear | Enter checkout | Esc back",
        (Route::Checkout, _) => "Enter edit form | Esc back",
        (Route::Orders, _) => "Up/Down move | Enter track | Esc back",
        (Route::Tracking, _) => "r refresh | l logs | Esc back",
        (Route::Profile, _) => "e edit | x sign out | Esc back",
        (Route::Auth, _) => "Enter edit | t sign in/up | Esc back",
    };
    let line = match &app.notice {
        Some(notice) => Line::from(vec![
            Span::styled(
                notice.clone(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" | "),
            Span::styled(hint, Style::default().fg(Color::DarkGray)),
        ]),
        None => Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))),
    };
    f.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn draw_logs(f: &mut Frame, app: &App, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(
            Block::default()
                .title(" Logs ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White).add_modifier(Modifier::DIM)),
        )
        .output_separator('|')
        .output_timestamp(Some("%H:%M:%S".to_string()))
        .output_level(Some(TuiLoggerLevelOutput::Abbreviated))
        .output_target(false)
        .output_file(false)
        .output_line(false)
        .style(Style::default().fg(Color::White))
        .state(&app.logger_state);
    f.render_widget(logs, area);
}

// ---- screens ------------------------------------------------------------

fn draw_home(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(area);

    let banner = Paragraph::new(vec![
        Line::from(Span::styled(
            "Hungry? We have you covered.",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from("Order from your favorite restaurants and track the delivery live."),
    ])
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(banner, chunks[0]);

    let cuisines: Vec<String> = CUISINE_FILTERS
        .iter()
        .map(|c| format!("{} {}", c.emoji, c.label))
        .collect();
    let tabs = Tabs::new(cuisines)
        .select(app.home_cuisine)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().title(" Cuisines ").borders(Borders::ALL));
    f.render_widget(tabs, chunks[1]);

    let block = Block::default().title(" Top Rated ").borders(Borders::ALL);
    if app.restaurants.is_loading() {
        f.render_widget(Paragraph::new("Loading restaurants...").block(block), chunks[2]);
        return;
    }
    let items: Vec<ListItem> = app
        .restaurants
        .top_rated(FEATURED_COUNT)
        .iter()
        .map(|r| restaurant_row(r))
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(app.home_cursor));
    f.render_stateful_widget(list, chunks[2], &mut state);
}

fn draw_restaurants(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let title = format!(
        " Search | cuisine: {} | sort: {} ",
        cuisine_label(&app.restaurants.cuisine),
        app.restaurants.sort.label()
    );
    draw_input(
        f,
        &app.search_input,
        &title,
        true,
        app.input_mode == InputMode::Editing,
        false,
        chunks[0],
    );

    let block = Block::default().title(" Restaurants ").borders(Borders::ALL);
    if app.restaurants.is_loading() {
        f.render_widget(Paragraph::new("Loading restaurants...").block(block), chunks[1]);
        return;
    }
    let visible = app.restaurants.visible();
    if visible.is_empty() {
        f.render_widget(
            Paragraph::new("No restaurants match. Try a different search or filter.").block(block),
            chunks[1],
        );
        return;
    }
    let items: Vec<ListItem> = visible.iter().map(|r| restaurant_row(r)).collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(app.list_cursor));
    f.render_stateful_widget(list, chunks[1], &mut state);
}

fn draw_menu(f: &mut Frame, app: &App, area: Rect) {
    match app.menu.state() {
        ViewState::Loading => {
            f.render_widget(
                Paragraph::new("Loading menu...")
                    .block(Block::default().borders(Borders::ALL)),
                area,
            );
            return;
        }
        ViewState::NotFound => {
            f.render_widget(
                Paragraph::new("This restaurant is no longer available.")
                    .block(Block::default().borders(Borders::ALL)),
                area,
            );
            return;
        }
        ViewState::Ready => {}
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(area);

    if let Some(r) = app.menu.restaurant() {
        let fee = if r.delivery_fee == 0.0 {
            "Free delivery".to_string()
        } else {
            format!("{} delivery", format_currency_decimal(r.delivery_fee))
        };
        let info = Paragraph::new(vec![
            Line::from(vec![
                Span::styled(
                    r.name.clone(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {:.1} ({})", r.rating, r.total_reviews),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(format!(
                    "  {} min | {} | min order {}",
                    r.avg_delivery_time,
                    fee,
                    format_currency(r.min_order_amount)
                )),
            ]),
            Line::from(Span::styled(
                r.description.clone().unwrap_or_default(),
                Style::default().fg(Color::Gray),
            )),
            Line::from(Span::styled(
                r.address.clone(),
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(info, chunks[0]);
    }

    let categories: Vec<String> = app
        .menu
        .categories()
        .iter()
        .map(|c| c.name.clone())
        .collect();
    let tabs = Tabs::new(categories)
        .select(app.menu.active_category_index())
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().title(" Categories ").borders(Borders::ALL));
    f.render_widget(tabs, chunks[1]);

    let items = app.menu.active_items();
    let block = Block::default().title(" Items ").borders(Borders::ALL);
    if items.is_empty() {
        f.render_widget(
            Paragraph::new("Nothing available in this category right now.").block(block),
            chunks[2],
        );
        return;
    }
    let rows: Vec<ListItem> = items.iter().map(|item| menu_item_row(item)).collect();
    let list = List::new(rows)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(app.menu_cursor));
    f.render_stateful_widget(list, chunks[2], &mut state);
}

fn draw_cart(f: &mut Frame, app: &App, area: Rect) {
    if app.cart.is_empty() {
        f.render_widget(
            Paragraph::new("Your cart is empty. Browse the restaurants and add something tasty.")
                .block(Block::default().title(" Cart ").borders(Borders::ALL)),
            area,
        );
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(6)])
        .split(area);

    let title = format!(
        " Cart | {} ",
        app.cart.restaurant_name().unwrap_or("unknown restaurant")
    );
    let rows: Vec<ListItem> = app
        .cart
        .items()
        .iter()
        .map(|line| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<28}", line.name),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("x{:<3}", line.quantity)),
                Span::raw(format!("{} each  ", format_currency(line.price))),
                Span::styled(
                    format_currency_decimal(line.price * f64::from(line.quantity)),
                    Style::default().fg(Color::Green),
                ),
            ]))
        })
        .collect();
    let list = List::new(rows)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(app.cart_cursor));
    f.render_stateful_widget(list, chunks[0], &mut state);

    let subtotal = app.cart.total();
    let pricing = &app.config.pricing;
    let totals = Paragraph::new(vec![
        Line::from(format!("Subtotal       {}", format_currency_decimal(subtotal))),
        Line::from(format!(
            "Delivery fee   {}",
            format_currency_decimal(pricing.delivery_fee)
        )),
        Line::from(format!(
            "Tax            {}",
            format_currency_decimal(pricing.tax(subtotal))
        )),
        Line::from(Span::styled(
            format!("Total          {}", format_currency_decimal(pricing.total(subtotal))),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
    ])
    .block(Block::default().title(" Summary ").borders(Borders::ALL));
    f.render_widget(totals, chunks[1]);
}

fn draw_checkout(f: &mut Frame, app: &App, area: Rect) {
    let suggestion_rows = app.autocomplete.suggestions().len() as u16;
    let dropdown = if suggestion_rows > 0 {
        suggestion_rows + 2
    } else {
        0
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(dropdown),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(area);

    let editing = app.input_mode == InputMode::Editing;
    draw_input(
        f,
        &app.checkout_inputs.address,
        " Delivery address ",
        app.checkout_inputs.focus == 0,
        editing,
        false,
        chunks[0],
    );

    if dropdown > 0 {
        let rows: Vec<ListItem> = app
            .autocomplete
            .suggestions()
            .iter()
            .map(|place| ListItem::new(place.display_name.clone()))
            .collect();
        let list = List::new(rows)
            .block(
                Block::default()
                    .title(" Suggestions ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        state.select(Some(app.autocomplete.selected()));
        f.render_stateful_widget(list, chunks[1], &mut state);
    }

    draw_input(
        f,
        &app.checkout_inputs.phone,
        " Phone ",
        app.checkout_inputs.focus == 1,
        editing,
        false,
        chunks[2],
    );
    draw_input(
        f,
        &app.checkout_inputs.instructions,
        " Instructions (optional) ",
        app.checkout_inputs.focus == 2,
        editing,
        false,
        chunks[3],
    );

    let subtotal = app.cart.total();
    let pricing = &app.config.pricing;
    let mut lines = vec![
        Line::from(format!(
            "{} items from {}",
            app.cart.item_count(),
            app.cart.restaurant_name().unwrap_or("unknown restaurant")
        )),
        Line::from(format!("Subtotal       {}", format_currency_decimal(subtotal))),
        Line::from(format!(
            "Delivery fee   {}",
            format_currency_decimal(pricing.delivery_fee)
        )),
        Line::from(format!(
            "Tax            {}",
            format_currency_decimal(pricing.tax(subtotal))
        )),
        Line::from(Span::styled(
            format!("Total          {}", format_currency_decimal(pricing.total(subtotal))),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Payment on delivery (cash)",
            Style::default().fg(Color::Gray),
        )),
    ];
    if app.checkout.submitting {
        lines.push(Line::from(Span::styled(
            "Placing your order...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
    }
    f.render_widget(
        Paragraph::new(lines).block(Block::default().title(" Order summary ").borders(Borders::ALL)),
        chunks[4],
    );
}

fn draw_orders(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().title(" Your Orders ").borders(Borders::ALL);
    if app.orders.is_loading() {
        f.render_widget(Paragraph::new("Loading orders...").block(block), area);
        return;
    }
    if app.orders.is_empty() {
        f.render_widget(
            Paragraph::new("No orders yet. Your first one is a few keystrokes away.").block(block),
            area,
        );
        return;
    }
    let rows: Vec<ListItem> = app
        .orders
        .entries()
        .iter()
        .map(|entry| {
            let name = entry
                .restaurant_name
                .as_deref()
                .unwrap_or("Unknown restaurant");
            let placed = entry
                .order
                .created_at
                .as_deref()
                .map(short_timestamp)
                .unwrap_or_default();
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<24}", name),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("{:<18}", humanize_status(entry.order.status.as_str())),
                    status_style(entry.order.status),
                ),
                Span::styled(
                    format!("{:>10}", format_currency_decimal(entry.order.total)),
                    Style::default().fg(Color::Green),
                ),
                Span::styled(format!("  {}", placed), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();
    let list = List::new(rows)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(app.orders_cursor));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_tracking(f: &mut Frame, app: &App, area: Rect) {
    match app.tracking.state() {
        ViewState::Loading => {
            f.render_widget(
                Paragraph::new("Loading order...").block(Block::default().borders(Borders::ALL)),
                area,
            );
            return;
        }
        ViewState::NotFound => {
            f.render_widget(
                Paragraph::new("We could not find that order.")
                    .block(Block::default().borders(Borders::ALL)),
                area,
            );
            return;
        }
        ViewState::Ready => {}
    }
    let Some(order) = app.tracking.order() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(area);

    let restaurant = app
        .tracking
        .restaurant()
        .map(|r| r.name.clone())
        .unwrap_or_else(|| "Unknown restaurant".to_string());
    let eta = order
        .estimated_delivery_time
        .as_deref()
        .map(short_timestamp)
        .unwrap_or_else(|| "-".to_string());
    let live = if app.tracking.has_live_updates() {
        Span::styled("live updates", Style::default().fg(Color::Green))
    } else {
        Span::styled("press r to refresh", Style::default().fg(Color::DarkGray))
    };
    let summary = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(
                restaurant,
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "  {}  ",
                format_currency_decimal(order.total)
            )),
            live,
        ]),
        Line::from(format!("Deliver to  {}", order.delivery_address)),
        Line::from(format!("ETA         {}", eta)),
    ])
    .block(
        Block::default()
            .title(format!(" Order {} ", short_id(&order.id)))
            .borders(Borders::ALL),
    );
    f.render_widget(summary, chunks[0]);

    if app.tracking.is_cancelled() {
        let banner = Paragraph::new(Span::styled(
            " This order was cancelled ",
            Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(banner, chunks[1]);
    } else {
        let gauge = Gauge::default()
            .block(Block::default().title(" Progress ").borders(Borders::ALL))
            .gauge_style(Style::default().fg(Color::Green))
            .ratio(app.tracking.progress().clamp(0.0, 1.0))
            .label(humanize_status(order.status.as_str()));
        f.render_widget(gauge, chunks[1]);
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[2]);

    if app.tracking.is_cancelled() {
        f.render_widget(
            Paragraph::new("The restaurant or support cancelled this order. Any payment will be refunded.")
                .wrap(Wrap { trim: true })
                .block(Block::default().title(" Status ").borders(Borders::ALL)),
            columns[0],
        );
    } else {
        let position = order.status.position();
        let steps: Vec<ListItem> = OrderStatus::PROGRESSION
            .iter()
            .enumerate()
            .map(|(i, step)| {
                let (marker, style) = match position {
                    Some(done) if i < done => ("[x]", Style::default().fg(Color::Green)),
                    Some(done) if i == done => (
                        "[>]",
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ),
                    _ => ("[ ]", Style::default().fg(Color::DarkGray)),
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!(" {} {:<16}", marker, step.label()), style),
                    Span::styled(step.description(), Style::default().fg(Color::DarkGray)),
                ]))
            })
            .collect();
        f.render_widget(
            List::new(steps).block(Block::default().title(" Journey ").borders(Borders::ALL)),
            columns[0],
        );
    }

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(5)])
        .split(columns[1]);

    let items: Vec<ListItem> = app
        .tracking
        .items()
        .iter()
        .map(|item| {
            ListItem::new(format!(
                "{:<24} x{:<3} {}",
                item.name,
                item.quantity,
                format_currency_decimal(item.total_price)
            ))
        })
        .collect();
    f.render_widget(
        List::new(items).block(Block::default().title(" Items ").borders(Borders::ALL)),
        right[0],
    );

    let pin = match (order.delivery_latitude, order.delivery_longitude) {
        (Some(lat), Some(lon)) => format!("  drop-off at {:.4}, {:.4}", lat, lon),
        _ => "  drop-off location pending".to_string(),
    };
    let map = Paragraph::new(vec![
        Line::from(Span::styled(
            "  ~ ~ ~ ~ ~ ~ ~ ~ ~ ~",
            Style::default().fg(Color::Cyan),
        )),
        Line::from(pin),
        Line::from(Span::styled(
            "  ~ ~ ~ ~ ~ ~ ~ ~ ~ ~",
            Style::default().fg(Color::Cyan),
        )),
    ])
    .block(Block::default().title(" Map ").borders(Borders::ALL));
    f.render_widget(map, right[1]);
}

fn draw_profile(f: &mut Frame, app: &App, area: Rect) {
    if app.input_mode == InputMode::Editing {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(1),
            ])
            .split(area);
        draw_input(
            f,
            &app.profile_inputs.name,
            " Full name ",
            app.profile_inputs.focus == 0,
            true,
            false,
            chunks[0],
        );
        draw_input(
            f,
            &app.profile_inputs.phone,
            " Phone ",
            app.profile_inputs.focus == 1,
            true,
            false,
            chunks[1],
        );
        draw_input(
            f,
            &app.profile_inputs.address,
            " Address ",
            app.profile_inputs.focus == 2,
            true,
            false,
            chunks[2],
        );
        return;
    }

    let block = Block::default().title(" Profile ").borders(Borders::ALL);
    if app.profile.is_loading() {
        f.render_widget(Paragraph::new("Loading profile...").block(block), area);
        return;
    }
    let Some(profile) = app.profile.profile() else {
        f.render_widget(
            Paragraph::new("No profile found for this account.").block(block),
            area,
        );
        return;
    };
    let phone = profile
        .phone
        .as_deref()
        .map(format_phone)
        .unwrap_or_else(|| "-".to_string());
    let coords = match (profile.latitude, profile.longitude) {
        (Some(lat), Some(lon)) => format!("{:.4}, {:.4}", lat, lon),
        _ => "-".to_string(),
    };
    let card = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("Email      ", Style::default().fg(Color::DarkGray)),
            Span::raw(profile.email.clone()),
        ]),
        Line::from(vec![
            Span::styled("Name       ", Style::default().fg(Color::DarkGray)),
            Span::raw(profile.full_name.clone().unwrap_or_else(|| "-".to_string())),
        ]),
        Line::from(vec![
            Span::styled("Phone      ", Style::default().fg(Color::DarkGray)),
            Span::raw(phone),
        ]),
        Line::from(vec![
            Span::styled("Address    ", Style::default().fg(Color::DarkGray)),
            Span::raw(profile.address.clone().unwrap_or_else(|| "-".to_string())),
        ]),
        Line::from(vec![
            Span::styled("Location   ", Style::default().fg(Color::DarkGray)),
            Span::raw(coords),
        ]),
    ])
    .block(block);
    f.render_widget(card, area);
}

fn draw_auth(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(area);

    let mode = if app.auth_inputs.sign_up {
        "Create an account"
    } else {
        "Sign in to your account"
    };
    f.render_widget(
        Paragraph::new(Span::styled(
            mode,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))
        .block(Block::default().borders(Borders::ALL)),
        chunks[0],
    );

    let editing = app.input_mode == InputMode::Editing;
    draw_input(
        f,
        &app.auth_inputs.email,
        " Email ",
        app.auth_inputs.focus == 0,
        editing,
        false,
        chunks[1],
    );
    draw_input(
        f,
        &app.auth_inputs.password,
        " Password ",
        app.auth_inputs.focus == 1,
        editing,
        true,
        chunks[2],
    );

    let status = if app.auth.is_none() {
        "Offline demo mode. You are already signed in as demo@foodiehub.app."
    } else if app.auth_inputs.busy {
        "Talking to the backend..."
    } else {
        ""
    };
    f.render_widget(
        Paragraph::new(Span::styled(status, Style::default().fg(Color::DarkGray)))
            .wrap(Wrap { trim: true }),
        chunks[3],
    );
}

fn draw_replace_modal(f: &mut Frame, current: &str) {
    let area = centered_rect(50, 30, f.area());
    f.render_widget(Clear, area);
    let text = vec![
        Line::raw(""),
        Line::from(format!("Your cart has items from {}.", current)),
        Line::from("Start a new cart with this item instead?"),
        Line::raw(""),
        Line::from(vec![
            Span::styled("[y] replace", Style::default().fg(Color::Green)),
            Span::raw("    "),
            Span::styled("[n] keep cart", Style::default().fg(Color::Red)),
        ]),
    ];
    let dialog = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Replace cart? ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
    f.render_widget(dialog, area);
}

// ---- widgets ------------------------------------------------------------

/// Single-line text input with the cursor placed when focused.
fn draw_input(
    f: &mut Frame,
    input: &Input,
    title: &str,
    focused: bool,
    editing: bool,
    mask: bool,
    area: Rect,
) {
    let active = focused && editing;
    let style = if active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let value = if mask {
        "*".repeat(input.value().chars().count())
    } else {
        input.value().to_string()
    };
    let width = area.width.max(3) - 3;
    let scroll = input.visual_scroll(width as usize);
    let widget = Paragraph::new(value)
        .style(style)
        .scroll((0, scroll as u16))
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(widget, area);
    if active {
        f.set_cursor_position((
            area.x + ((input.visual_cursor().max(scroll) - scroll) as u16) + 1,
            area.y + 1,
        ));
    }
}

fn restaurant_row(r: &Restaurant) -> ListItem<'static> {
    let fee = if r.delivery_fee == 0.0 {
        "free delivery".to_string()
    } else {
        format!("{} fee", format_currency_decimal(r.delivery_fee))
    };
    ListItem::new(Line::from(vec![
        Span::styled(
            format!("{:<24}", r.name),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{:.1} ({:>3}) ", r.rating, r.total_reviews),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(format!("{:<14}", r.cuisine_type), Style::default().fg(Color::Magenta)),
        Span::raw(format!("{:>3} min | {}", r.avg_delivery_time, fee)),
    ]))
}

fn menu_item_row(item: &MenuItem) -> ListItem<'static> {
    let mut marks = String::new();
    if item.is_vegetarian {
        marks.push_str(" veg");
    }
    if item.is_spicy {
        marks.push_str(" spicy");
    }
    ListItem::new(vec![
        Line::from(vec![
            Span::styled(
                format!("{:<30}", item.name),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("{:>8}", format_currency(item.price)),
                Style::default().fg(Color::Green),
            ),
            Span::styled(marks, Style::default().fg(Color::Magenta)),
        ]),
        Line::from(Span::styled(
            format!("    {}", item.description.clone().unwrap_or_default()),
            Style::default().fg(Color::DarkGray),
        )),
    ])
}

fn status_style(status: OrderStatus) -> Style {
    match status {
        OrderStatus::Delivered => Style::default().fg(Color::Green),
        OrderStatus::Cancelled => Style::default().fg(Color::Red),
        OrderStatus::OutForDelivery => Style::default().fg(Color::Cyan),
        _ => Style::default().fg(Color::Yellow),
    }
}

/// "2026-08-25T10:30:00+00:00" -> "2026-08-25 10:30"
fn short_timestamp(ts: &str) -> String {
    let mut parts = ts.split('T');
    let date = parts.next().unwrap_or(ts);
    let time = parts.next().and_then(|t| t.get(..5)).unwrap_or("");
    format!("{} {}", date, time)
}

/// First chunk of a UUID, enough to tell orders apart on screen
fn short_id(id: &str) -> &str {
    id.split('-').next().unwrap_or(id)
}

fn cuisine_label(value: &str) -> &str {
    CUISINE_FILTERS
        .iter()
        .find(|c| c.value == value)
        .map(|c| c.label)
        .unwrap_or(value)
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}

#[cfg(test)]
mod tests {
    use super::{short_id, short_timestamp};

    #[test]
    fn timestamps_shorten_for_display() {
        assert_eq!(
            short_timestamp("2026-08-25T10:30:00+00:00"),
            "2026-08-25 10:30"
        );
        assert_eq!(short_timestamp("not-a-timestamp"), "not-a-timestamp ");
    }

    #[test]
    fn ids_shorten_to_the_first_chunk() {
        assert_eq!(short_id("3f1c9a2e-5d77-4b21-9c3a-000000000000"), "3f1c9a2e");
        assert_eq!(short_id("42"), "42");
    }
}
