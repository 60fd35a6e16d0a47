use serde::{Deserialize, Serialize};

use crate::utils::format_brl;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
}

/// A product as listed by the public storefront endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(rename = "preco_venda")]
    pub price: f64,
    #[serde(rename = "preco_promocional", default)]
    pub promotional_price: Option<f64>,
    #[serde(rename = "estoque_disponivel", default)]
    pub in_stock: bool,
    #[serde(rename = "destaque", default)]
    pub featured: bool,
    #[serde(rename = "genero", default)]
    pub gender: Option<String>,
    #[serde(rename = "faixa_etaria", default)]
    pub age_range: Option<String>,
    #[serde(rename = "imagem", default)]
    pub image: Option<String>,
    #[serde(rename = "categorias", default)]
    pub categories: Vec<Category>,
}

impl Product {
    /// Price a customer pays: the promotional price when one is set and lower.
    pub fn effective_price(&self) -> f64 {
        match self.promotional_price {
            Some(promo) if promo > 0.0 && promo < self.price => promo,
            _ => self.price,
        }
    }

    pub fn is_on_sale(&self) -> bool {
        self.effective_price() < self.price
    }

    pub fn display_price(&self) -> String {
        if self.is_on_sale() {
            format!("{} (de {})", format_brl(self.effective_price()), format_brl(self.price))
        } else {
            format_brl(self.price)
        }
    }
}

/// One page of `GET /produtos`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductPage {
    #[serde(rename = "produtos", default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub total: u64,
    #[serde(rename = "paginas", default)]
    pub pages: u64,
    #[serde(rename = "pagina_atual", default)]
    pub current_page: u64,
    #[serde(rename = "por_pagina", default)]
    pub per_page: u64,
}

impl ProductPage {
    pub fn has_next(&self) -> bool {
        self.current_page < self.pages
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductOrder {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    Name,
}

impl ProductOrder {
    pub fn as_param(&self) -> &'static str {
        match self {
            ProductOrder::Newest => "recentes",
            ProductOrder::PriceAsc => "preco_asc",
            ProductOrder::PriceDesc => "preco_desc",
            ProductOrder::Name => "nome",
        }
    }

    pub fn from_param(s: &str) -> Option<Self> {
        match s {
            "recentes" => Some(ProductOrder::Newest),
            "preco_asc" => Some(ProductOrder::PriceAsc),
            "preco_desc" => Some(ProductOrder::PriceDesc),
            "nome" => Some(ProductOrder::Name),
            _ => None,
        }
    }
}

/// Filters for the product listing. Unset fields are not sent.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub category_id: Option<i64>,
    pub gender: Option<String>,
    pub age_range: Option<String>,
    pub search: Option<String>,
    pub featured: bool,
    pub order: ProductOrder,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ProductQuery {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(id) = self.category_id {
            params.push(("categoria_id", id.to_string()));
        }
        if let Some(ref gender) = self.gender {
            params.push(("genero", gender.clone()));
        }
        if let Some(ref age) = self.age_range {
            params.push(("faixa_etaria", age.clone()));
        }
        if let Some(ref q) = self.search {
            if !q.trim().is_empty() {
                params.push(("q", q.trim().to_string()));
            }
        }
        if self.featured {
            params.push(("destaque", "true".to_string()));
        }
        if self.order != ProductOrder::Newest {
            params.push(("ordem", self.order.as_param().to_string()));
        }
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            params.push(("per_page", per_page.to_string()));
        }
        params
    }
}
