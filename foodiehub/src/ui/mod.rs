//! Terminal UI
//!
//! One screen per route over the view models. The UI task owns all app
//! state; data loads run as spawned tasks and report back through the
//! [`events::AppEvent`] channel, so the draw loop never blocks on the
//! network.

pub mod events;
pub mod render;

use std::io::Stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::{mpsc, watch};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;
use tui_logger::{TuiWidgetEvent, TuiWidgetState};

use hub_client::store::fixtures::DEMO_USER_ID;
use hub_client::{AuthClient, AuthUser, DataStore, GeoClient, MemoryStore, RestStore, Session};
use shared::cuisine::CUISINE_FILTERS;
use shared::models::{OrderStatus, ProfileUpdate};

use crate::autocomplete::{AddressAutocomplete, MAX_SUGGESTIONS};
use crate::cart::storage::JsonFileStorage;
use crate::cart::{AddOutcome, CartCandidate, CartStore};
use crate::config::AppConfig;
use crate::views::checkout::{CheckoutFlow, CheckoutForm, place_order};
use crate::views::menu::MenuView;
use crate::views::orders::OrdersView;
use crate::views::profile::ProfileView;
use crate::views::restaurants::RestaurantsView;
use crate::views::tracking::TrackingView;
use events::AppEvent;

/// Poll interval for terminal events; also paces background ticks
const TICK: Duration = Duration::from_millis(100);

/// Restaurants shown on the home screen
const FEATURED_COUNT: usize = 5;

/// Client-side routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    Restaurants,
    RestaurantDetail,
    Cart,
    Checkout,
    Orders,
    Tracking,
    Profile,
    Auth,
}

impl Route {
    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Restaurants => "Restaurants",
            Route::RestaurantDetail => "Menu",
            Route::Cart => "Cart",
            Route::Checkout => "Checkout",
            Route::Orders => "Your Orders",
            Route::Tracking => "Order Tracking",
            Route::Profile => "Profile",
            Route::Auth => "Sign In",
        }
    }

    fn needs_session(&self) -> bool {
        matches!(self, Route::Checkout | Route::Orders | Route::Profile)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Blocking confirmation dialog; captures all keys while open
#[derive(Debug, Default)]
pub enum Modal {
    #[default]
    None,
    /// Cart holds items from another restaurant
    ReplaceCart {
        candidate: CartCandidate,
        current: String,
    },
}

/// Sign-in form state
#[derive(Debug, Default)]
pub struct AuthInputs {
    pub email: Input,
    pub password: Input,
    pub focus: usize,
    pub sign_up: bool,
    pub busy: bool,
}

impl AuthInputs {
    const FIELDS: usize = 2;

    fn current_mut(&mut self) -> &mut Input {
        match self.focus {
            0 => &mut self.email,
            _ => &mut self.password,
        }
    }

    fn next_field(&mut self) {
        self.focus = (self.focus + 1) % Self::FIELDS;
    }

    fn prev_field(&mut self) {
        self.focus = (self.focus + Self::FIELDS - 1) % Self::FIELDS;
    }
}

/// Checkout form widgets, kept in sync with [`CheckoutForm`]
#[derive(Debug, Default)]
pub struct CheckoutInputs {
    pub address: Input,
    pub phone: Input,
    pub instructions: Input,
    pub focus: usize,
}

impl CheckoutInputs {
    const FIELDS: usize = 3;

    fn sync_from(&mut self, form: &CheckoutForm) {
        self.address = Input::new(form.address.clone());
        self.phone = Input::new(form.phone.clone());
        self.instructions = Input::new(form.instructions.clone());
    }

    fn current_mut(&mut self) -> &mut Input {
        match self.focus {
            0 => &mut self.address,
            1 => &mut self.phone,
            _ => &mut self.instructions,
        }
    }

    fn next_field(&mut self) {
        self.focus = (self.focus + 1) % Self::FIELDS;
    }

    fn prev_field(&mut self) {
        self.focus = (self.focus + Self::FIELDS - 1) % Self::FIELDS;
    }
}

/// Profile edit form widgets
#[derive(Debug, Default)]
pub struct ProfileInputs {
    pub name: Input,
    pub phone: Input,
    pub address: Input,
    pub focus: usize,
}

impl ProfileInputs {
    const FIELDS: usize = 3;

    fn current_mut(&mut self) -> &mut Input {
        match self.focus {
            0 => &mut self.name,
            1 => &mut self.phone,
            _ => &mut self.address,
        }
    }

    fn next_field(&mut self) {
        self.focus = (self.focus + 1) % Self::FIELDS;
    }

    fn prev_field(&mut self) {
        self.focus = (self.focus + Self::FIELDS - 1) % Self::FIELDS;
    }
}

/// The whole application
pub struct App {
    config: AppConfig,
    store: Arc<dyn DataStore>,
    geo: GeoClient,
    auth: Option<AuthClient>,
    session: Option<Session>,
    session_rx: Option<watch::Receiver<Option<Session>>>,

    route: Route,
    nav: Vec<Route>,
    input_mode: InputMode,
    modal: Modal,
    notice: Option<String>,
    show_logs: bool,
    should_quit: bool,
    logger_state: TuiWidgetState,

    cart: CartStore,
    restaurants: RestaurantsView,
    menu: MenuView,
    orders: OrdersView,
    tracking: TrackingView,
    profile: ProfileView,
    checkout: CheckoutFlow,
    autocomplete: AddressAutocomplete,

    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,

    search_input: Input,
    auth_inputs: AuthInputs,
    checkout_inputs: CheckoutInputs,
    profile_inputs: ProfileInputs,

    home_cuisine: usize,
    home_cursor: usize,
    list_cursor: usize,
    menu_cursor: usize,
    cart_cursor: usize,
    orders_cursor: usize,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let client_config = config.client_config();
        let geo = GeoClient::new(&client_config);

        let (store, auth): (Arc<dyn DataStore>, Option<AuthClient>) = if config.is_offline() {
            tracing::info!("No API key configured, starting offline with the demo catalog");
            (Arc::new(MemoryStore::with_sample_data()), None)
        } else {
            let http = client_config.build_rest_client();
            let auth = AuthClient::new(http.clone());
            let store = RestStore::with_client(http, client_config.feed_addr.clone());
            (Arc::new(store), Some(auth))
        };

        // The offline demo runs as the seeded account so every screen works
        let session = auth.is_none().then(|| Session {
            access_token: String::new(),
            expires_at: None,
            user: AuthUser {
                id: DEMO_USER_ID.to_string(),
                email: "demo@foodiehub.app".to_string(),
            },
        });
        let session_rx = auth.as_ref().map(|a| a.watch());

        let cart = CartStore::new(Box::new(JsonFileStorage::new(&config.data_dir)));
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            geo,
            auth,
            session,
            session_rx,
            route: Route::Home,
            nav: Vec::new(),
            input_mode: InputMode::Normal,
            modal: Modal::None,
            notice: None,
            show_logs: false,
            should_quit: false,
            logger_state: TuiWidgetState::new(),
            cart,
            restaurants: RestaurantsView::new(store.clone()),
            menu: MenuView::new(store.clone()),
            orders: OrdersView::new(store.clone()),
            tracking: TrackingView::new(store.clone()),
            profile: ProfileView::new(store.clone()),
            checkout: CheckoutFlow::default(),
            autocomplete: AddressAutocomplete::new(),
            events_tx,
            events_rx,
            search_input: Input::default(),
            auth_inputs: AuthInputs::default(),
            checkout_inputs: CheckoutInputs::default(),
            profile_inputs: ProfileInputs::default(),
            home_cuisine: 0,
            home_cursor: 0,
            list_cursor: 0,
            menu_cursor: 0,
            cart_cursor: 0,
            orders_cursor: 0,
            store,
            config,
        }
    }

    /// Drive the UI until the user quits
    pub async fn run(
        mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> anyhow::Result<()> {
        self.restaurants.set_loading();
        self.spawn_restaurants_load();

        loop {
            terminal.draw(|f| render::draw(f, &self))?;

            if event::poll(TICK)? {
                if let Event::Key(key) = event::read()? {
                    if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                        self.on_key(key);
                    }
                }
            }

            while let Ok(event) = self.events_rx.try_recv() {
                self.on_event(event);
            }

            self.on_tick();

            if self.should_quit {
                // Release the order feed before tearing down the terminal
                self.tracking.close().await;
                return Ok(());
            }

            tokio::task::yield_now().await;
        }
    }

    // ---- navigation -----------------------------------------------------

    fn navigate(&mut self, route: Route) {
        if route == self.route {
            return;
        }
        if route.needs_session() && self.session.is_none() {
            self.set_notice("Sign in to continue");
            if self.route != Route::Auth {
                self.leave_current();
                self.nav.push(self.route);
                self.route = Route::Auth;
                self.enter(Route::Auth);
            }
            return;
        }
        self.notice = None;
        self.leave_current();
        self.nav.push(self.route);
        self.route = route;
        self.enter(route);
    }

    /// Esc: pop the navigation stack; quitting from home
    fn back(&mut self) {
        self.leave_current();
        if let Some(route) = self.nav.pop() {
            self.route = route;
            self.input_mode = InputMode::Normal;
        } else if self.route == Route::Home {
            self.should_quit = true;
        } else {
            self.route = Route::Home;
            self.input_mode = InputMode::Normal;
        }
    }

    fn leave_current(&mut self) {
        if self.route == Route::Tracking {
            if let Some(subscription) = self.tracking.take_subscription() {
                tokio::spawn(async move {
                    if let Err(e) = subscription.close().await {
                        tracing::debug!("Order feed close failed: {}", e);
                    }
                });
            }
        }
    }

    fn enter(&mut self, route: Route) {
        self.input_mode = InputMode::Normal;
        match route {
            Route::Home | Route::Restaurants => {
                if self.restaurants.is_empty() && !self.restaurants.is_loading() {
                    self.restaurants.set_loading();
                    self.spawn_restaurants_load();
                }
            }
            Route::Orders => {
                self.orders_cursor = 0;
                self.spawn_orders_load();
            }
            Route::Profile => self.spawn_profile_load(),
            Route::Auth => {
                self.auth_inputs = AuthInputs::default();
                self.input_mode = InputMode::Editing;
            }
            Route::Checkout => self.enter_checkout(),
            _ => {}
        }
    }

    fn open_restaurant(&mut self, id: &str) {
        self.menu.begin(id);
        self.menu_cursor = 0;
        let store = self.store.clone();
        let tx = self.events_tx.clone();
        let id = id.to_string();
        tokio::spawn(async move {
            let result = MenuView::load(&store, &id).await.map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::MenuLoaded {
                restaurant_id: id,
                result,
            });
        });
        self.navigate(Route::RestaurantDetail);
    }

    fn open_tracking(&mut self, order_id: &str) {
        self.tracking.begin(order_id);
        let store = self.store.clone();
        let tx = self.events_tx.clone();
        let id = order_id.to_string();
        tokio::spawn(async move {
            let result = TrackingView::load(&store, &id, true)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::TrackingLoaded {
                order_id: id,
                result,
            });
        });
        self.navigate(Route::Tracking);
    }

    // ---- background loads -----------------------------------------------

    fn spawn_restaurants_load(&self) {
        let store = self.store.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let rows = RestaurantsView::load(&store).await;
            let _ = tx.send(AppEvent::RestaurantsLoaded(rows));
        });
    }

    fn spawn_orders_load(&mut self) {
        let Some(user_id) = self.session.as_ref().map(|s| s.user.id.clone()) else {
            return;
        };
        self.orders.set_loading();
        let store = self.store.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = OrdersView::load(&store, &user_id)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::OrdersLoaded(result));
        });
    }

    fn spawn_profile_load(&mut self) {
        let Some(user_id) = self.session.as_ref().map(|s| s.user.id.clone()) else {
            return;
        };
        self.profile.set_loading();
        let store = self.store.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = ProfileView::load(&store, &user_id)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::ProfileLoaded(result));
        });
    }

    fn enter_checkout(&mut self) {
        self.checkout.submitting = false;
        if let Some(profile) = self.profile.profile() {
            self.checkout.prefill(profile);
        } else {
            self.spawn_profile_load();
        }
        self.checkout_inputs.sync_from(&self.checkout.form);
        self.autocomplete.dismiss();
        self.input_mode = InputMode::Editing;
        self.resolve_missing_address();
    }

    /// Turn known coordinates into a textual address when the field is
    /// still empty, best effort.
    fn resolve_missing_address(&self) {
        if !self.checkout.form.address.is_empty() {
            return;
        }
        let Some((lat, lon)) = self.checkout.form.coords else {
            return;
        };
        let geo = self.geo.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            match geo.reverse(lat, lon).await {
                Ok(place) => {
                    let _ = tx.send(AppEvent::AddressResolved(place.display_name));
                }
                Err(e) => tracing::debug!("Reverse geocode failed: {}", e),
            }
        });
    }

    fn submit_checkout(&mut self) {
        if self.checkout.submitting {
            return;
        }
        self.checkout.submitting = true;
        let store = self.store.clone();
        let pricing = self.config.pricing;
        let customer_id = self.session.as_ref().map(|s| s.user.id.clone());
        let draft = self.cart.snapshot();
        let form = self.checkout.form.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = place_order(&store, &pricing, customer_id.as_deref(), &draft, &form)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::OrderPlaced(result));
        });
    }

    fn submit_auth(&mut self) {
        if self.auth_inputs.busy {
            return;
        }
        let email = self.auth_inputs.email.value().trim().to_string();
        let password = self.auth_inputs.password.value().to_string();
        if email.is_empty() || password.is_empty() {
            self.set_notice("Email and password are required");
            return;
        }
        let Some(auth) = self.auth.clone() else {
            self.set_notice("Offline demo is already signed in");
            return;
        };
        self.auth_inputs.busy = true;
        let sign_up = self.auth_inputs.sign_up;
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            if sign_up {
                match auth.sign_up(&email, &password).await {
                    Ok(session) => {
                        let _ = tx.send(AppEvent::SignedUp {
                            confirmed: session.is_some(),
                        });
                    }
                    Err(e) => {
                        let _ = tx.send(AppEvent::AuthFailed(e.to_string()));
                    }
                }
            } else if let Err(e) = auth.sign_in(&email, &password).await {
                let _ = tx.send(AppEvent::AuthFailed(e.to_string()));
            }
            // A successful sign-in lands through the session watch channel
        });
    }

    fn sign_out(&mut self) {
        let Some(auth) = self.auth.clone() else {
            self.set_notice("Offline demo stays signed in");
            return;
        };
        tokio::spawn(async move {
            if let Err(e) = auth.sign_out().await {
                tracing::warn!("Sign out request failed: {}", e);
            }
        });
    }

    fn start_profile_edit(&mut self) {
        let Some(profile) = self.profile.profile() else {
            self.set_notice("Profile is still loading");
            return;
        };
        self.profile_inputs = ProfileInputs {
            name: Input::new(profile.full_name.clone().unwrap_or_default()),
            phone: Input::new(profile.phone.clone().unwrap_or_default()),
            address: Input::new(profile.address.clone().unwrap_or_default()),
            focus: 0,
        };
        self.input_mode = InputMode::Editing;
    }

    fn submit_profile(&mut self) {
        let Some(user_id) = self.session.as_ref().map(|s| s.user.id.clone()) else {
            return;
        };
        let phone = self.profile_inputs.phone.value().trim().to_string();
        if !phone.is_empty() && !shared::currency::is_valid_phone(&phone) {
            self.set_notice("Enter a valid 10-digit mobile number");
            return;
        }
        let update = ProfileUpdate {
            full_name: non_empty(self.profile_inputs.name.value()),
            phone: non_empty(&phone),
            address: non_empty(self.profile_inputs.address.value()),
        };
        let store = self.store.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = ProfileView::save(&store, &user_id, &update)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::ProfileSaved(result));
        });
    }

    // ---- key handling ---------------------------------------------------

    fn on_key(&mut self, key: KeyEvent) {
        if !matches!(self.modal, Modal::None) {
            self.on_modal_key(key.code);
            return;
        }
        match self.input_mode {
            InputMode::Editing => self.on_editing_key(key),
            InputMode::Normal => self.on_normal_key(key),
        }
    }

    fn on_modal_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('y') | KeyCode::Enter => {
                if let Modal::ReplaceCart { candidate, .. } = std::mem::take(&mut self.modal) {
                    let name = candidate.name.clone();
                    self.cart.add_replacing(candidate);
                    self.set_notice(format!("Cart replaced, {} added", name));
                }
            }
            KeyCode::Char('n') | KeyCode::Esc => self.modal = Modal::None,
            _ => {}
        }
    }

    fn on_normal_key(&mut self, key: KeyEvent) {
        if self.route_key(key.code) {
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc => self.back(),
            KeyCode::Char('l') => self.show_logs = !self.show_logs,
            KeyCode::PageUp => self.logger_state.transition(TuiWidgetEvent::PrevPageKey),
            KeyCode::PageDown => self.logger_state.transition(TuiWidgetEvent::NextPageKey),
            KeyCode::Char('r') => self.navigate(Route::Restaurants),
            KeyCode::Char('c') => self.navigate(Route::Cart),
            KeyCode::Char('o') => self.navigate(Route::Orders),
            KeyCode::Char('p') => self.navigate(Route::Profile),
            _ => {}
        }
    }

    /// Route-local keys. Returns whether the key was consumed.
    fn route_key(&mut self, code: KeyCode) -> bool {
        match self.route {
            Route::Home => self.on_home_key(code),
            Route::Restaurants => self.on_restaurants_key(code),
            Route::RestaurantDetail => self.on_menu_key(code),
            Route::Cart => self.on_cart_key(code),
            Route::Checkout => self.on_checkout_key(code),
            Route::Orders => self.on_orders_key(code),
            Route::Tracking => self.on_tracking_key(code),
            Route::Profile => self.on_profile_key(code),
            Route::Auth => self.on_auth_key(code),
        }
    }

    fn on_home_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Up => {
                self.home_cursor = self.home_cursor.saturating_sub(1);
                true
            }
            KeyCode::Down => {
                let len = self.restaurants.top_rated(FEATURED_COUNT).len();
                if self.home_cursor + 1 < len {
                    self.home_cursor += 1;
                }
                true
            }
            KeyCode::Left => {
                self.home_cuisine =
                    (self.home_cuisine + CUISINE_FILTERS.len() - 1) % CUISINE_FILTERS.len();
                true
            }
            KeyCode::Right => {
                self.home_cuisine = (self.home_cuisine + 1) % CUISINE_FILTERS.len();
                true
            }
            KeyCode::Enter => {
                let id = self
                    .restaurants
                    .top_rated(FEATURED_COUNT)
                    .get(self.home_cursor)
                    .map(|r| r.id.clone());
                if let Some(id) = id {
                    self.open_restaurant(&id);
                }
                true
            }
            KeyCode::Char('r') => {
                // Browse with the highlighted cuisine applied
                self.restaurants.cuisine = CUISINE_FILTERS[self.home_cuisine].value.to_string();
                self.list_cursor = 0;
                self.navigate(Route::Restaurants);
                true
            }
            KeyCode::Char('/') => {
                self.navigate(Route::Restaurants);
                self.search_input = Input::default();
                self.restaurants.search.clear();
                self.list_cursor = 0;
                self.input_mode = InputMode::Editing;
                true
            }
            _ => false,
        }
    }

    fn on_restaurants_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('/') => {
                self.search_input = Input::new(self.restaurants.search.clone());
                self.input_mode = InputMode::Editing;
                true
            }
            KeyCode::Char('f') => {
                self.restaurants.next_cuisine();
                self.list_cursor = 0;
                true
            }
            KeyCode::Char('s') => {
                self.restaurants.next_sort();
                self.list_cursor = 0;
                true
            }
            KeyCode::Up => {
                self.list_cursor = self.list_cursor.saturating_sub(1);
                true
            }
            KeyCode::Down => {
                let len = self.restaurants.visible().len();
                if self.list_cursor + 1 < len {
                    self.list_cursor += 1;
                }
                true
            }
            KeyCode::Enter => {
                let id = self
                    .restaurants
                    .visible()
                    .get(self.list_cursor)
                    .map(|r| r.id.clone());
                if let Some(id) = id {
                    self.open_restaurant(&id);
                }
                true
            }
            _ => false,
        }
    }

    fn on_menu_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Left => {
                self.menu.prev_category();
                self.menu_cursor = 0;
                true
            }
            KeyCode::Right => {
                self.menu.next_category();
                self.menu_cursor = 0;
                true
            }
            KeyCode::Up => {
                self.menu_cursor = self.menu_cursor.saturating_sub(1);
                true
            }
            KeyCode::Down => {
                let len = self.menu.active_items().len();
                if self.menu_cursor + 1 < len {
                    self.menu_cursor += 1;
                }
                true
            }
            KeyCode::Enter | KeyCode::Char('a') => {
                self.add_selected_item();
                true
            }
            _ => false,
        }
    }

    fn add_selected_item(&mut self) {
        let candidate = match (
            self.menu.restaurant(),
            self.menu.active_items().get(self.menu_cursor).copied(),
        ) {
            (Some(restaurant), Some(item)) => CartCandidate::from_menu_item(item, restaurant),
            _ => return,
        };
        let name = candidate.name.clone();
        match self.cart.add(candidate.clone()) {
            AddOutcome::Added | AddOutcome::Merged => {
                self.set_notice(format!("{} added to cart", name));
            }
            AddOutcome::DifferentRestaurant { current } => {
                self.modal = Modal::ReplaceCart { candidate, current };
            }
        }
    }

    fn on_cart_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Up => {
                self.cart_cursor = self.cart_cursor.saturating_sub(1);
                true
            }
            KeyCode::Down => {
                if self.cart_cursor + 1 < self.cart.items().len() {
                    self.cart_cursor += 1;
                }
                true
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.bump_cart_line(1);
                true
            }
            KeyCode::Char('-') => {
                self.bump_cart_line(-1);
                true
            }
            KeyCode::Char('x') => {
                let id = self
                    .cart
                    .items()
                    .get(self.cart_cursor)
                    .map(|line| line.menu_item_id.clone());
                if let Some(id) = id {
                    self.cart.remove(&id);
                    self.clamp_cart_cursor();
                }
                true
            }
            KeyCode::Char('X') => {
                self.cart.clear();
                self.cart_cursor = 0;
                true
            }
            KeyCode::Enter => {
                if self.cart.is_empty() {
                    self.set_notice("Your cart is empty");
                } else {
                    self.navigate(Route::Checkout);
                }
                true
            }
            _ => false,
        }
    }

    fn bump_cart_line(&mut self, delta: i64) {
        let line = self
            .cart
            .items()
            .get(self.cart_cursor)
            .map(|line| (line.menu_item_id.clone(), line.quantity as i64));
        if let Some((id, quantity)) = line {
            self.cart.update_quantity(&id, quantity + delta);
            self.clamp_cart_cursor();
        }
    }

    fn clamp_cart_cursor(&mut self) {
        self.cart_cursor = self
            .cart_cursor
            .min(self.cart.items().len().saturating_sub(1));
    }

    fn on_checkout_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Enter | KeyCode::Char('e') => {
                self.input_mode = InputMode::Editing;
                true
            }
            _ => false,
        }
    }

    fn on_orders_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Up => {
                self.orders_cursor = self.orders_cursor.saturating_sub(1);
                true
            }
            KeyCode::Down => {
                if self.orders_cursor + 1 < self.orders.len() {
                    self.orders_cursor += 1;
                }
                true
            }
            KeyCode::Enter => {
                let id = self
                    .orders
                    .entries()
                    .get(self.orders_cursor)
                    .map(|entry| entry.order.id.clone());
                if let Some(id) = id {
                    self.open_tracking(&id);
                }
                true
            }
            _ => false,
        }
    }

    fn on_tracking_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('r') => {
                let Some(order_id) = self.tracking.order_id().map(String::from) else {
                    return true;
                };
                let store = self.store.clone();
                let tx = self.events_tx.clone();
                tokio::spawn(async move {
                    let result = TrackingView::load(&store, &order_id, false)
                        .await
                        .map_err(|e| e.to_string());
                    let _ = tx.send(AppEvent::TrackingLoaded { order_id, result });
                });
                true
            }
            _ => false,
        }
    }

    fn on_profile_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('e') | KeyCode::Enter => {
                self.start_profile_edit();
                true
            }
            KeyCode::Char('x') => {
                self.sign_out();
                true
            }
            _ => false,
        }
    }

    fn on_auth_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('e') | KeyCode::Enter => {
                self.input_mode = InputMode::Editing;
                true
            }
            KeyCode::Char('t') => {
                self.auth_inputs.sign_up = !self.auth_inputs.sign_up;
                true
            }
            _ => false,
        }
    }

    fn on_editing_key(&mut self, key: KeyEvent) {
        match self.route {
            Route::Restaurants => self.on_search_editing_key(key),
            Route::Checkout => self.on_checkout_editing_key(key),
            Route::Auth => self.on_auth_editing_key(key),
            Route::Profile => self.on_profile_editing_key(key),
            _ => self.input_mode = InputMode::Normal,
        }
    }

    fn on_search_editing_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => self.input_mode = InputMode::Normal,
            _ => {
                self.search_input.handle_event(&Event::Key(key));
                self.restaurants.search = self.search_input.value().to_string();
                self.list_cursor = 0;
            }
        }
    }

    fn on_checkout_editing_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                if self.autocomplete.is_open() {
                    self.autocomplete.dismiss();
                } else {
                    self.input_mode = InputMode::Normal;
                }
            }
            KeyCode::Tab => {
                self.checkout_inputs.next_field();
                self.autocomplete.dismiss();
            }
            KeyCode::BackTab => {
                self.checkout_inputs.prev_field();
                self.autocomplete.dismiss();
            }
            KeyCode::Down if self.autocomplete.is_open() => self.autocomplete.select_next(),
            KeyCode::Up if self.autocomplete.is_open() => self.autocomplete.select_prev(),
            KeyCode::Enter => {
                if self.autocomplete.is_open() && self.checkout_inputs.focus == 0 {
                    if let Some(place) = self.autocomplete.choose() {
                        self.checkout.form.coords = place.coords();
                        self.checkout.form.address = place.display_name.clone();
                        self.checkout_inputs.address = Input::new(place.display_name);
                    }
                } else if self.checkout_inputs.focus + 1 < CheckoutInputs::FIELDS {
                    self.checkout_inputs.next_field();
                } else {
                    self.submit_checkout();
                }
            }
            _ => {
                self.checkout_inputs
                    .current_mut()
                    .handle_event(&Event::Key(key));
                self.sync_checkout_form();
            }
        }
    }

    fn sync_checkout_form(&mut self) {
        let address = self.checkout_inputs.address.value().to_string();
        if address != self.checkout.form.address {
            // Manual edits invalidate previously picked coordinates
            self.checkout.form.coords = None;
            self.autocomplete.input(&address, Instant::now());
            self.checkout.form.address = address;
        }
        self.checkout.form.phone = self.checkout_inputs.phone.value().to_string();
        self.checkout.form.instructions = self.checkout_inputs.instructions.value().to_string();
    }

    fn on_auth_editing_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.input_mode = InputMode::Normal,
            KeyCode::Tab | KeyCode::Down => self.auth_inputs.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.auth_inputs.prev_field(),
            KeyCode::F(2) => self.auth_inputs.sign_up = !self.auth_inputs.sign_up,
            KeyCode::Enter => self.submit_auth(),
            _ => {
                self.auth_inputs.current_mut().handle_event(&Event::Key(key));
            }
        }
    }

    fn on_profile_editing_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.input_mode = InputMode::Normal,
            KeyCode::Tab | KeyCode::Down => self.profile_inputs.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.profile_inputs.prev_field(),
            KeyCode::Enter => self.submit_profile(),
            _ => {
                self.profile_inputs
                    .current_mut()
                    .handle_event(&Event::Key(key));
            }
        }
    }

    // ---- background completions -----------------------------------------

    fn on_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::RestaurantsLoaded(rows) => {
                self.restaurants.apply(rows);
                self.home_cursor = 0;
                self.list_cursor = 0;
            }
            AppEvent::MenuLoaded {
                restaurant_id,
                result,
            } => match result {
                Ok(payload) => self.menu.apply(&restaurant_id, payload),
                Err(e) => {
                    self.set_notice(format!("Could not load the menu: {}", e));
                    if self.route == Route::RestaurantDetail {
                        self.back();
                    }
                }
            },
            AppEvent::OrdersLoaded(result) => match result {
                Ok(entries) => {
                    self.orders.apply(entries);
                    self.orders_cursor = 0;
                }
                Err(e) => {
                    self.orders.apply(Vec::new());
                    self.set_notice(format!("Could not load orders: {}", e));
                }
            },
            AppEvent::TrackingLoaded { order_id, result } => match result {
                Ok(payload) => self.tracking.apply(&order_id, payload),
                Err(e) => {
                    self.set_notice(format!("Could not load the order: {}", e));
                    if self.route == Route::Tracking {
                        self.back();
                    }
                }
            },
            AppEvent::ProfileLoaded(result) => match result {
                Ok(profile) => {
                    if let Some(profile) = &profile {
                        if self.route == Route::Checkout {
                            self.checkout.prefill(profile);
                            self.checkout_inputs.sync_from(&self.checkout.form);
                            self.resolve_missing_address();
                        }
                    }
                    self.profile.apply(profile);
                }
                Err(e) => {
                    self.profile.apply(None);
                    self.set_notice(format!("Could not load the profile: {}", e));
                }
            },
            AppEvent::ProfileSaved(result) => match result {
                Ok(profile) => {
                    self.profile.apply(Some(profile));
                    self.input_mode = InputMode::Normal;
                    self.set_notice("Profile saved");
                }
                Err(e) => self.set_notice(format!("Could not save the profile: {}", e)),
            },
            AppEvent::OrderPlaced(result) => {
                self.checkout.submitting = false;
                match result {
                    Ok(order_id) => {
                        self.cart.clear();
                        self.cart_cursor = 0;
                        self.checkout.reset();
                        self.checkout_inputs = CheckoutInputs::default();
                        self.autocomplete.dismiss();
                        self.input_mode = InputMode::Normal;
                        self.set_notice("Order placed");
                        // Back from tracking should land on home, not the
                        // spent checkout form
                        self.nav.clear();
                        self.route = Route::Home;
                        self.open_tracking(&order_id);
                    }
                    Err(e) => self.set_notice(e),
                }
            }
            AppEvent::Suggestions { seq, places } => {
                if self.route == Route::Checkout {
                    self.autocomplete.apply_results(seq, places);
                }
            }
            AppEvent::AddressResolved(address) => {
                if self.route == Route::Checkout && self.checkout.form.address.is_empty() {
                    self.checkout.form.address = address.clone();
                    self.checkout_inputs.address = Input::new(address);
                }
            }
            AppEvent::AuthFailed(e) => {
                self.auth_inputs.busy = false;
                self.set_notice(e);
            }
            AppEvent::SignedUp { confirmed } => {
                self.auth_inputs.busy = false;
                // A confirmed signup reaches us through the session channel
                if !confirmed {
                    self.auth_inputs.sign_up = false;
                    self.set_notice("Account created. Confirm your email, then sign in");
                }
            }
        }
    }

    // ---- per-frame work -------------------------------------------------

    fn on_tick(&mut self) {
        if self.route == Route::Checkout {
            if let Some((seq, text)) = self.autocomplete.take_lookup(Instant::now()) {
                let geo = self.geo.clone();
                let tx = self.events_tx.clone();
                tokio::spawn(async move {
                    match geo.search(&text, MAX_SUGGESTIONS).await {
                        Ok(places) => {
                            let _ = tx.send(AppEvent::Suggestions { seq, places });
                        }
                        Err(e) => tracing::debug!("Address lookup failed: {}", e),
                    }
                });
            }
        }

        let delivered = self.tracking.poll_changes()
            && self
                .tracking
                .order()
                .is_some_and(|order| order.status == OrderStatus::Delivered);
        if delivered {
            self.set_notice("Order delivered, enjoy!");
        }

        self.poll_session();
    }

    fn poll_session(&mut self) {
        let Some(rx) = self.session_rx.as_mut() else {
            return;
        };
        if !rx.has_changed().unwrap_or(false) {
            return;
        }
        let session = rx.borrow_and_update().clone();
        let had_session = self.session.is_some();
        self.session = session;
        match (&self.session, had_session) {
            (Some(session), _) => {
                self.auth_inputs.busy = false;
                self.set_notice(format!("Signed in as {}", session.user.email));
                if self.route == Route::Auth {
                    self.back();
                    self.enter(self.route);
                }
            }
            (None, true) => {
                self.profile.clear();
                self.set_notice("Signed out");
                if self.route.needs_session() {
                    self.nav.clear();
                    self.route = Route::Home;
                    self.input_mode = InputMode::Normal;
                }
            }
            (None, false) => {}
        }
    }

    fn set_notice(&mut self, notice: impl Into<String>) {
        let notice = notice.into();
        tracing::info!("{}", notice);
        self.notice = Some(notice);
    }
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
