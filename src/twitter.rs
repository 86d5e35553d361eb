// Twitter v1.1 adapter: media upload and status update, signed with OAuth
// 1.0a user credentials.

use crate::config::{Config, TwitterCredentials};
use crate::error::{ClientError, Error, Result};
use crate::http;
use crate::oauth;
use crate::posting::{CreatePost, MediaHandle, PostId, UploadMedia};
use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub struct TwitterClient {
    client: Client,
    api_base: String,
    upload_base: String,
    credentials: TwitterCredentials,
}

#[derive(Deserialize, Debug)]
struct UploadResponse {
    media_id_string: String,
}

#[derive(Deserialize, Debug)]
struct StatusResponse {
    id_str: String,
}

impl TwitterClient {
    pub fn from_config(config: &Config) -> Result<Self> {
        let credentials = config.twitter()?.clone();
        let client = http::build_client(config.timeout)
            .map_err(|e| Error::Auth(format!("Unable to build Twitter client: {}", e)))?;
        Ok(Self::with_client(
            client,
            &config.endpoints.twitter_api,
            &config.endpoints.twitter_upload,
            credentials,
        ))
    }

    pub fn with_client(
        client: Client,
        api_base: &str,
        upload_base: &str,
        credentials: TwitterCredentials,
    ) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            upload_base: upload_base.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// POST a signed form and decode the JSON reply.
    fn post_form<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> std::result::Result<T, ClientError> {
        let header = oauth::authorization_header(&self.credentials, "POST", url, params)?;
        let res = self
            .client
            .post(url)
            .header(AUTHORIZATION, header)
            .form(params)
            .send()?;
        Ok(http::check(res)?.json()?)
    }
}

impl UploadMedia for TwitterClient {
    fn upload_media(&self, media_data: &str) -> std::result::Result<MediaHandle, ClientError> {
        let url = format!("{}/media/upload.json", self.upload_base);
        let res: UploadResponse = self.post_form(&url, &[("media_data", media_data)])?;
        Ok(MediaHandle(res.media_id_string))
    }
}

impl CreatePost for TwitterClient {
    fn create_post(
        &self,
        text: &str,
        media: Option<&MediaHandle>,
    ) -> std::result::Result<PostId, ClientError> {
        let url = format!("{}/statuses/update.json", self.api_base);
        let mut params = vec![("status", text)];
        if let Some(media) = media {
            params.push(("media_ids", media.0.as_str()));
        }
        let res: StatusResponse = self.post_form(&url, &params)?;
        Ok(PostId(res.id_str))
    }
}
