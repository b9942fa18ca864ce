use super::*;

#[derive(Clone)]
pub(crate) struct Client {
  base_url: String,
  client: reqwest::Client,
  token: String,
}

impl Default for Client {
  fn default() -> Self {
    let base_url = env::var("CONVOSE_BASE_URL")
      .unwrap_or_else(|_| Self::BASE_URL.to_string());

    let token = env::var("CONVOSE_AUTH_TOKEN")
      .unwrap_or_else(|_| Self::AUTH_TOKEN.to_string());

    Self {
      base_url,
      client: reqwest::Client::new(),
      token,
    }
  }
}

impl Client {
  const AUTH_TOKEN: &str = "Jy8RZCXvvc6pZQUu2QZ2";

  const BASE_URL: &str = "https://be-v2.convose.com";

  pub(crate) async fn autocomplete(
    &self,
    query: &str,
    page: usize,
  ) -> Result<Vec<Suggestion>> {
    let value = self
      .client
      .get(format!("{}/autocomplete/interests", self.base_url))
      .query(&query_params(query, page))
      .header("Authorization", &self.token)
      .header("Accept", "application/json")
      .send()
      .await?
      .json::<Value>()
      .await?;

    Ok(AutocompleteResponse::decode(value))
  }
}

pub(crate) fn query_params(
  query: &str,
  page: usize,
) -> [(&'static str, String); 3] {
  [
    ("q", query.to_string()),
    ("limit", PAGE_SIZE.to_string()),
    ("from", (page * PAGE_SIZE).to_string()),
  ]
}
