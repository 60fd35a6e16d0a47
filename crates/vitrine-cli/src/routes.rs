//! Path table for the views the CLI can open.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Products,
    Login,
    Dashboard,
    AdminProducts,
    AdminSales,
    AdminCustomers,
    AdminFinance,
}

impl Route {
    pub const ALL: [Route; 8] = [
        Route::Home,
        Route::Products,
        Route::Login,
        Route::Dashboard,
        Route::AdminProducts,
        Route::AdminSales,
        Route::AdminCustomers,
        Route::AdminFinance,
    ];

    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" => "/",
            other => other,
        };
        Self::ALL.into_iter().find(|route| route.path() == normalized)
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Products => "/produtos",
            Route::Login => "/login",
            Route::Dashboard => "/admin",
            Route::AdminProducts => "/admin/produtos",
            Route::AdminSales => "/admin/vendas",
            Route::AdminCustomers => "/admin/clientes",
            Route::AdminFinance => "/admin/financeiro",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Início",
            Route::Products => "Produtos",
            Route::Login => "Entrar",
            Route::Dashboard => "Dashboard",
            Route::AdminProducts => "Gestão de Produtos",
            Route::AdminSales => "Vendas",
            Route::AdminCustomers => "Clientes",
            Route::AdminFinance => "Financeiro",
        }
    }
}
