//! Plain-text renderings of the storefront and back-office views.

use vitrine_core::models::{DashboardSummary, ProductPage, UserIdentity};
use vitrine_core::utils::{format_brl, format_change, format_optional, truncate_string};

use crate::routes::Route;

/// Maximum description length shown in the product list
const DESCRIPTION_WIDTH: usize = 60;

pub fn pending() -> String {
    "Carregando...".to_string()
}

pub fn home() -> String {
    let mut lines = vec![
        "Baby Fashion - Roupas Infantis com Amor".to_string(),
        "Qualidade e conforto para seu bebê".to_string(),
        String::new(),
        "Categorias:".to_string(),
    ];
    lines.extend(["Roupinhas", "Calçados", "Acessórios"].iter().map(|c| format!("  - {}", c)));
    lines.join("\n")
}

pub fn products(page: &ProductPage) -> String {
    if page.products.is_empty() {
        return "Nenhum produto encontrado.".to_string();
    }

    let mut lines = Vec::new();
    for product in &page.products {
        let stock = if product.in_stock { "" } else { " [esgotado]" };
        lines.push(format!("{:<8} {}{}", product.code, product.name, stock));
        lines.push(format!("         {}", product.display_price()));
        if let Some(ref description) = product.description {
            lines.push(format!("         {}", truncate_string(description, DESCRIPTION_WIDTH)));
        }
        lines.push(format!("         Faixa etária: {}", format_optional(&product.age_range, "-")));
    }
    lines.push(format!(
        "Página {} de {} ({} produtos)",
        page.current_page,
        page.pages.max(1),
        page.total
    ));
    lines.join("\n")
}

pub fn dashboard(summary: &DashboardSummary) -> String {
    let alert = if summary.has_stock_alerts() { " (!)" } else { "" };
    [
        format!(
            "Vendas do Mês:   {} ({})",
            format_brl(summary.sales_this_month),
            format_change(summary.growth_percent)
        ),
        format!("Nº de Vendas:    {}", summary.sales_count),
        format!("Ticket Médio:    {}", format_brl(summary.average_ticket)),
        format!("Alertas Estoque: {}{}", summary.stock_alerts, alert),
    ]
    .join("\n")
}

pub fn placeholder(route: Route) -> String {
    format!("{}\nMódulo em desenvolvimento...", route.title())
}

pub fn login_hint() -> String {
    "Use `vitrine login` para entrar.\nUsuário demo: admin@loja.com / senha: admin123".to_string()
}

pub fn identity(identity: &UserIdentity) -> String {
    let email = match (&identity.name, &identity.email) {
        (Some(_), Some(email)) => format!(" <{}>", email),
        _ => String::new(),
    };
    let kind = identity
        .kind
        .as_ref()
        .map(|k| format!(" ({})", k))
        .unwrap_or_default();
    format!("{}{}{}", identity.display_name(), email, kind)
}
