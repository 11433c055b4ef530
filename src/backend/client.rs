//! HTTP client for the REST (PostgREST) interface.
//!
//! This module provides a small query builder and a low-level client that
//! executes queries against `{base_url}/rest/v1/{table}`, handling the API key
//! and bearer headers, the `return=representation` preference for writes, and
//! error body parsing.

use super::error::{BackendError, BackendResult};
use log::*;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Response};
use serde::{de::DeserializeOwned, Serialize};

/// Specify sort direction for ordered queries.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Describes one request against a table: selected columns, equality
/// filters, and ordering.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    table: String,
    columns: String,
    filters: Vec<(String, String)>,
    order: Option<(String, SortOrder)>,
}

impl Query {
    /// Start a query selecting all columns from the table.
    ///
    pub fn from(table: &str) -> Self {
        Query {
            table: table.to_owned(),
            columns: String::from("*"),
            filters: vec![],
            order: None,
        }
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.columns = columns.to_owned();
        self
    }

    /// Add an equality filter on the column.
    ///
    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.filters.push((column.to_owned(), value.to_owned()));
        self
    }

    pub fn order(mut self, column: &str, order: SortOrder) -> Self {
        self.order = Some((column.to_owned(), order));
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns the equality filters as (column, value) pairs.
    ///
    pub fn filters(&self) -> &[(String, String)] {
        &self.filters
    }

    /// Returns the query string parameters in PostgREST syntax.
    ///
    pub fn params(&self, include_select: bool) -> Vec<(String, String)> {
        let mut params = vec![];
        if include_select {
            params.push(("select".to_string(), self.columns.clone()));
        }
        for (column, value) in self.filters.iter() {
            params.push((column.clone(), format!("eq.{}", value)));
        }
        if let Some((column, order)) = &self.order {
            let direction = match order {
                SortOrder::Ascending => "asc",
                SortOrder::Descending => "desc",
            };
            params.push(("order".to_string(), format!("{}.{}", column, direction)));
        }
        params
    }
}

/// Makes requests to the REST interface and tries to conform response data
/// to the requested row type.
///
#[derive(Clone)]
pub struct Client {
    base_url: String,
    api_key: String,
    http_client: reqwest::Client,
}

impl Client {
    /// Returns a new instance for the given base URL and public API key.
    ///
    pub fn new(base_url: &str, api_key: &str, http_client: reqwest::Client) -> Self {
        Client {
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
            http_client,
        }
    }

    /// Return every row matching the query.
    ///
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        query: &Query,
        bearer: Option<&str>,
    ) -> BackendResult<Vec<T>> {
        let response = self
            .call(Method::GET, query, true, bearer, None::<&()>)
            .await?;
        Self::rows(response).await
    }

    /// Return the single row matching the query, or a not-found error naming
    /// the resource when no row matches.
    ///
    pub async fn fetch_one<T: DeserializeOwned>(
        &self,
        query: &Query,
        bearer: Option<&str>,
        resource: &'static str,
    ) -> BackendResult<T> {
        let mut rows = self.fetch::<T>(query, bearer).await?;
        if rows.is_empty() {
            return Err(BackendError::NotFound(resource));
        }
        if rows.len() > 1 {
            warn!(
                "Expected one row from '{}' but received {}; using the first.",
                query.table(),
                rows.len()
            );
        }
        Ok(rows.swap_remove(0))
    }

    /// Insert the payload and return the inserted rows.
    ///
    pub async fn insert<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        query: &Query,
        body: &B,
        bearer: Option<&str>,
    ) -> BackendResult<Vec<T>> {
        let response = self
            .call(Method::POST, query, true, bearer, Some(body))
            .await?;
        Self::rows(response).await
    }

    /// Apply the payload to rows matching the query and return them.
    ///
    pub async fn update<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        query: &Query,
        body: &B,
        bearer: Option<&str>,
    ) -> BackendResult<Vec<T>> {
        let response = self
            .call(Method::PATCH, query, true, bearer, Some(body))
            .await?;
        Self::rows(response).await
    }

    /// Delete rows matching the query.
    ///
    pub async fn delete(&self, query: &Query, bearer: Option<&str>) -> BackendResult<()> {
        self.call(Method::DELETE, query, false, bearer, None::<&()>)
            .await?;
        Ok(())
    }

    /// Deserialize a successful response body as rows. An empty body is
    /// treated as no rows.
    ///
    async fn rows<T: DeserializeOwned>(response: Response) -> BackendResult<Vec<T>> {
        let bytes = response.bytes().await?;
        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(vec![]);
        }
        match serde_json::from_slice::<Vec<T>>(&bytes) {
            Ok(rows) => Ok(rows),
            Err(e) => {
                error!(
                    "Failed to deserialize rows: {}. Response body: {}",
                    e,
                    String::from_utf8_lossy(&bytes)
                );
                Err(e.into())
            }
        }
    }

    /// Make request and return the response or an error for non-success
    /// statuses.
    ///
    async fn call<B: Serialize + ?Sized>(
        &self,
        method: Method,
        query: &Query,
        include_select: bool,
        bearer: Option<&str>,
        body: Option<&B>,
    ) -> BackendResult<Response> {
        let url = format!("{}/rest/v1/{}", self.base_url, query.table());
        let params = query.params(include_select);
        debug!("{} {} {:?}", method, url, params);

        let mut request = self
            .http_client
            .request(method.clone(), &url)
            .headers(self.headers(bearer)?)
            .query(&params);

        if matches!(method, Method::POST | Method::PATCH | Method::DELETE) {
            request = request.header("Prefer", "return=representation");
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("Unable to read response"));
            error!("Request to '{}' failed with status {}: {}", url, status, body);
            return Err(BackendError::from_response(status.as_u16(), &body));
        }
        Ok(response)
    }

    /// Build the API key and bearer headers. The public API key doubles as the
    /// bearer when no session token is supplied.
    ///
    fn headers(&self, bearer: Option<&str>) -> BackendResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        let api_key = HeaderValue::from_str(&self.api_key)
            .map_err(|_| BackendError::Other("API key is not a valid header value".into()))?;
        let token = bearer.unwrap_or(&self.api_key);
        let authorization = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| BackendError::Other("Access token is not a valid header value".into()))?;
        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::MockServer;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: String,
    }

    fn client(server: &MockServer) -> Client {
        Client::new(&server.base_url(), "anon-key", reqwest::Client::new())
    }

    #[test]
    fn query_params_in_postgrest_syntax() {
        let query = Query::from("tasks")
            .eq("user_id", "u1")
            .order("created_at", SortOrder::Descending);
        assert_eq!(
            query.params(true),
            vec![
                ("select".to_string(), "*".to_string()),
                ("user_id".to_string(), "eq.u1".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
            ]
        );
        assert_eq!(
            query.params(false),
            vec![
                ("user_id".to_string(), "eq.u1".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
            ]
        );
    }

    #[test]
    fn query_select_columns() {
        let query = Query::from("meals").select("id,name");
        assert_eq!(query.params(true)[0].1, "id,name");
        assert!(query.filters().is_empty());
    }

    #[tokio::test]
    async fn fetch_sends_key_and_bearer() {
        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/rest/v1/meals")
                    .header("apikey", "anon-key")
                    .header("Authorization", "Bearer user-token")
                    .query_param("select", "*");
                then.status(200).json_body(json!([{ "id": "1" }, { "id": "2" }]));
            })
            .await;

        let rows: Vec<Row> = client(&server)
            .fetch(&Query::from("meals"), Some("user-token"))
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn fetch_without_session_uses_api_key_as_bearer() {
        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/rest/v1/meals")
                    .header("Authorization", "Bearer anon-key");
                then.status(200).json_body(json!([]));
            })
            .await;

        let rows: Vec<Row> = client(&server)
            .fetch(&Query::from("meals"), None)
            .await
            .unwrap();
        mock.assert_async().await;
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn fetch_one_with_no_rows_is_not_found() {
        let server = MockServer::start();
        server
            .mock_async(|when, then| {
                when.method("GET").path("/rest/v1/meals");
                then.status(200).json_body(json!([]));
            })
            .await;

        let result = client(&server)
            .fetch_one::<Row>(&Query::from("meals").eq("id", "404"), None, "Meal")
            .await;
        match result {
            Err(BackendError::NotFound(resource)) => assert_eq!(resource, "Meal"),
            other => panic!("expected not found, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn error_status_is_parsed() {
        let server = MockServer::start();
        server
            .mock_async(|when, then| {
                when.method("GET").path("/rest/v1/tasks");
                then.status(401).json_body(json!({
                    "code": "PGRST301",
                    "message": "JWT expired"
                }));
            })
            .await;

        let result = client(&server).fetch::<Row>(&Query::from("tasks"), None).await;
        match result {
            Err(BackendError::ApiError { status, details }) => {
                assert_eq!(status, 401);
                assert_eq!(details.message.as_deref(), Some("JWT expired"));
            }
            other => panic!("expected api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn insert_requests_representation() {
        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/rest/v1/tasks")
                    .header("Prefer", "return=representation")
                    .json_body(json!({ "title": "x" }));
                then.status(201).json_body(json!([{ "id": "new" }]));
            })
            .await;

        let rows: Vec<Row> = client(&server)
            .insert(&Query::from("tasks"), &json!({ "title": "x" }), Some("t"))
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(rows, vec![Row { id: "new".into() }]);
    }

    #[tokio::test]
    async fn delete_filters_without_select() {
        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("DELETE")
                    .path("/rest/v1/tasks")
                    .query_param("id", "eq.abc");
                then.status(204);
            })
            .await;

        client(&server)
            .delete(&Query::from("tasks").eq("id", "abc"), Some("t"))
            .await
            .unwrap();
        mock.assert_async().await;
    }
}
