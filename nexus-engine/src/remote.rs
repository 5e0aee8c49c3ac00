use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::Deserialize;

use nexus_db::models::Draw;

/// Résultat d'une requête pour un tirage donné.
#[derive(Debug, Clone, PartialEq)]
pub enum RoundOutcome {
    Drawn(Draw),
    /// Le service répond mais le tirage n'a pas (encore) eu lieu.
    NotYetDrawn,
    /// Timeout, erreur réseau ou réponse illisible. Traité comme une absence.
    Transient(String),
}

/// Source distante de tirages, interrogée un tirage à la fois.
pub trait DrawSource {
    fn fetch_round(&self, round: u32) -> RoundOutcome;
}

#[derive(Debug, Deserialize)]
struct RoundResponse {
    #[serde(rename = "returnValue")]
    return_value: String,
    #[serde(rename = "drwNo")]
    round: Option<u32>,
    #[serde(rename = "drwtNo1")]
    n1: Option<u8>,
    #[serde(rename = "drwtNo2")]
    n2: Option<u8>,
    #[serde(rename = "drwtNo3")]
    n3: Option<u8>,
    #[serde(rename = "drwtNo4")]
    n4: Option<u8>,
    #[serde(rename = "drwtNo5")]
    n5: Option<u8>,
    #[serde(rename = "drwtNo6")]
    n6: Option<u8>,
}

/// Interprète le corps JSON renvoyé pour `requested`.
pub fn parse_round_response(body: &str, requested: u32) -> RoundOutcome {
    let response: RoundResponse = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => return RoundOutcome::Transient(format!("JSON invalide : {}", e)),
    };

    if response.return_value != "success" {
        return RoundOutcome::NotYetDrawn;
    }

    let numbers = [response.n1, response.n2, response.n3, response.n4, response.n5, response.n6];
    if numbers.iter().any(|n| n.is_none()) {
        return RoundOutcome::Transient(format!("Tirage {} : numéros manquants", requested));
    }
    let numbers = numbers.map(|n| n.unwrap_or_default());

    let round = response.round.unwrap_or(requested);
    if round != requested {
        return RoundOutcome::Transient(format!("Tirage {} demandé, {} reçu", requested, round));
    }

    match Draw::new(round, numbers) {
        Ok(draw) => RoundOutcome::Drawn(draw),
        Err(e) => RoundOutcome::Transient(format!("Tirage {} invalide : {}", round, e)),
    }
}

/// Client HTTP bloquant vers le service public des résultats.
pub struct LottoApi {
    client: Client,
    base_url: String,
}

impl LottoApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Impossible de construire le client HTTP")?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }
}

impl DrawSource for LottoApi {
    fn fetch_round(&self, round: u32) -> RoundOutcome {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("method", "getLottoNumber"), ("drwNo", &round.to_string())])
            .send();

        let response = match response {
            Ok(r) => r,
            Err(e) => return RoundOutcome::Transient(e.to_string()),
        };

        if !response.status().is_success() {
            return RoundOutcome::Transient(format!("HTTP {}", response.status()));
        }

        match response.text() {
            Ok(body) => parse_round_response(&body, round),
            Err(e) => RoundOutcome::Transient(e.to_string()),
        }
    }
}
