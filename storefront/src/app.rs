//! Application wiring: the root state, the root action, the root reducer and
//! the [`Storefront`] entry point that owns the store and its effects.

use crate::account::{AccountAction, AccountFacade, UserReducer, UserState};
use crate::basket::{BasketAction, BasketFacade, BasketReducer, BasketState};
use crate::config::StorefrontConfig;
use crate::messages::{MessageAction, MessageFacade, MessageReducer, MessageState};
use crate::orders::{OrderAction, OrderFacade, OrderReducer, OrderState};
use crate::organization::{
    OrganizationAction, OrganizationHierarchiesFacade, OrganizationReducer, OrganizationState,
};
use crate::recurring_orders::{
    RecurringOrderAction, RecurringOrderReducer, RecurringOrderState, RecurringOrdersFacade,
};
use crate::return_request::{
    ReturnRequestAction, ReturnRequestFacade, ReturnRequestReducer, ReturnRequestState,
};
use crate::wishlist::{WishlistAction, WishlistFacade, WishlistReducer, WishlistState};
use crate::{account, basket, orders, organization, recurring_orders, return_request, wishlist};
use storefront_core::composition::{CombinedReducer, combine_reducers, scope_reducer};
use storefront_core::service::ApiService;
use storefront_macros::Action;
use storefront_runtime::{EffectRuntime, HealthReport, Store, StoreError};

/// The whole client state: one independently reduced slice per feature
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    /// Session: customer, user, token
    pub user: UserState,
    /// Current basket
    pub basket: BasketState,
    /// The user's wishlists
    pub wishlists: WishlistState,
    /// Order history
    pub orders: OrderState,
    /// Return requests and their lookups
    pub return_requests: ReturnRequestState,
    /// Recurring orders
    pub recurring_orders: RecurringOrderState,
    /// Organization hierarchy groups
    pub organization: OrganizationState,
    /// User-facing notifications
    pub messages: MessageState,
}

/// Every action the storefront understands
#[derive(Action, Clone, Debug, PartialEq)]
pub enum AppAction {
    /// Session and profile
    #[nested]
    Account(AccountAction),

    /// Basket
    #[nested]
    Basket(BasketAction),

    /// Wishlists
    #[nested]
    Wishlist(WishlistAction),

    /// Orders
    #[nested]
    Order(OrderAction),

    /// Return requests
    #[nested]
    ReturnRequest(ReturnRequestAction),

    /// Recurring orders
    #[nested]
    RecurringOrder(RecurringOrderAction),

    /// Organization hierarchies
    #[nested]
    Organization(OrganizationAction),

    /// Notifications
    #[nested]
    Message(MessageAction),
}

macro_rules! lift_actions {
    ($($variant:ident($action:ty)),* $(,)?) => {
        $(
            impl From<$action> for AppAction {
                fn from(action: $action) -> Self {
                    Self::$variant(action)
                }
            }
        )*
    };
}

lift_actions!(
    Account(AccountAction),
    Basket(BasketAction),
    Wishlist(WishlistAction),
    Order(OrderAction),
    ReturnRequest(ReturnRequestAction),
    RecurringOrder(RecurringOrderAction),
    Organization(OrganizationAction),
    Message(MessageAction),
);

/// Root reducer type
pub type AppReducer = CombinedReducer<AppState, AppAction>;

/// The application store
pub type AppStore = Store<AppState, AppAction, AppReducer>;

/// The application effect runtime
pub type AppRuntime = EffectRuntime<AppState, AppAction, AppReducer>;

/// Build the root reducer from the feature reducers
#[must_use]
pub fn app_reducer() -> AppReducer {
    combine_reducers(vec![
        Box::new(scope_reducer(UserReducer, |s: &mut AppState| &mut s.user)),
        Box::new(scope_reducer(BasketReducer, |s: &mut AppState| &mut s.basket)),
        Box::new(scope_reducer(WishlistReducer, |s: &mut AppState| &mut s.wishlists)),
        Box::new(scope_reducer(OrderReducer, |s: &mut AppState| &mut s.orders)),
        Box::new(scope_reducer(ReturnRequestReducer, |s: &mut AppState| {
            &mut s.return_requests
        })),
        Box::new(scope_reducer(RecurringOrderReducer, |s: &mut AppState| {
            &mut s.recurring_orders
        })),
        Box::new(scope_reducer(OrganizationReducer, |s: &mut AppState| &mut s.organization)),
        Box::new(scope_reducer(MessageReducer, |s: &mut AppState| &mut s.messages)),
    ])
}

/// The storefront: one store, its effects and the facades over them.
///
/// # Example
///
/// ```ignore
/// let config = StorefrontConfig::from_env()?;
/// let api = RestApiService::new(&config)?;
/// let storefront = Storefront::start(api, &config)?;
///
/// storefront.account().login_user(Credentials::new("patricia", "secret"))?;
/// let mut user = storefront.account().user();
/// while let Some(user) = user.next().await { /* render */ }
/// ```
pub struct Storefront {
    store: AppStore,
    runtime: AppRuntime,
}

impl Storefront {
    /// Create the store and register every feature's effects against `api`.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store shut down
    /// while effects were being registered.
    pub fn start<Api: ApiService>(api: Api, config: &StorefrontConfig) -> Result<Self, StoreError> {
        let store = Store::with_config(AppState::default(), app_reducer(), config.store.clone());
        let runtime = EffectRuntime::new(store.clone());

        account::register_effects(&runtime, &api)?;
        basket::register_effects(&runtime, &api)?;
        wishlist::register_effects(&runtime, &api)?;
        orders::register_effects(&runtime, &api)?;
        return_request::register_effects(&runtime, &api)?;
        recurring_orders::register_effects(&runtime, &api)?;
        organization::register_effects(&runtime, &api)?;

        tracing::info!(effects = runtime.registered().len(), "Storefront started");
        Ok(Self { store, runtime })
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &AppStore {
        &self.store
    }

    /// Session and profile commands
    #[must_use]
    pub fn account(&self) -> AccountFacade {
        AccountFacade::new(self.store.clone())
    }

    /// Basket commands
    #[must_use]
    pub fn basket(&self) -> BasketFacade {
        BasketFacade::new(self.store.clone())
    }

    /// Wishlist commands
    #[must_use]
    pub fn wishlists(&self) -> WishlistFacade {
        WishlistFacade::new(self.store.clone())
    }

    /// Order history commands
    #[must_use]
    pub fn orders(&self) -> OrderFacade {
        OrderFacade::new(self.store.clone())
    }

    /// Return request commands
    #[must_use]
    pub fn return_requests(&self) -> ReturnRequestFacade {
        ReturnRequestFacade::new(self.store.clone())
    }

    /// Recurring order commands
    #[must_use]
    pub fn recurring_orders(&self) -> RecurringOrdersFacade {
        RecurringOrdersFacade::new(self.store.clone())
    }

    /// Organization hierarchy commands
    #[must_use]
    pub fn organization(&self) -> OrganizationHierarchiesFacade {
        OrganizationHierarchiesFacade::new(self.store.clone())
    }

    /// Notifications
    #[must_use]
    pub fn messages(&self) -> MessageFacade {
        MessageFacade::new(self.store.clone())
    }

    /// Health of the store and the effect loops
    #[must_use]
    pub fn health(&self) -> HealthReport {
        HealthReport::new(vec![self.store.health(), self.runtime.health()])
    }

    /// Stop all effects and the store
    pub fn shutdown(&self) {
        self.runtime.shutdown();
    }
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("dispatched", &self.store.dispatched())
            .field("effects", &self.runtime.registered())
            .finish()
    }
}
