use aws_config::BehaviorVersion;

/// Build an S3 client from the default AWS credential and region chain.
pub async fn build_client() -> aws_sdk_s3::Client {
    let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
    aws_sdk_s3::Client::new(&config)
}
