use serde::{Deserialize, Serialize};

/// Back-office summary from `GET /dashboard/resumo`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    #[serde(rename = "vendas_mes", default)]
    pub sales_this_month: f64,
    #[serde(rename = "vendas_mes_anterior", default)]
    pub sales_last_month: f64,
    #[serde(rename = "crescimento_percentual", default)]
    pub growth_percent: f64,
    #[serde(rename = "numero_vendas", default)]
    pub sales_count: u64,
    #[serde(rename = "ticket_medio", default)]
    pub average_ticket: f64,
    #[serde(rename = "total_clientes", default)]
    pub total_customers: u64,
    #[serde(rename = "produtos_ativos", default)]
    pub active_products: u64,
    #[serde(rename = "alertas_estoque", default)]
    pub stock_alerts: u64,
}

impl DashboardSummary {
    pub fn is_growing(&self) -> bool {
        self.growth_percent > 0.0
    }

    pub fn has_stock_alerts(&self) -> bool {
        self.stock_alerts > 0
    }
}
