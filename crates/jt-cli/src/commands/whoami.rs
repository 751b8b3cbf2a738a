//! Shows the signed-in user.

use std::io::Write;

use anyhow::Result;

use jt_jira::{JiraClient, Transport};

use super::util::explain;

pub async fn run<W: Write, T: Transport>(writer: &mut W, client: &JiraClient<T>) -> Result<()> {
    let user = client.current_user().await.map_err(explain)?;
    if user.email.is_empty() {
        writeln!(writer, "{} ({})", user.display_name, user.account_id)?;
    } else {
        writeln!(
            writer,
            "{} <{}> ({})",
            user.display_name, user.email, user.account_id
        )?;
    }
    writeln!(writer, "Site: {}", client.connection().base_url())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use jt_jira::Method;

    use crate::commands::testing::{StubTransport, client, myself_body};

    #[tokio::test]
    async fn prints_user_and_site() {
        let client = client(StubTransport::default().route(
            Method::Get,
            "/rest/api/3/myself",
            200,
            myself_body(),
        ));

        let mut output = Vec::new();
        run(&mut output, &client).await.unwrap();

        insta::assert_snapshot!(String::from_utf8(output).unwrap(), @r"
        Ada Lovelace <ada@example.com> (acc-1)
        Site: https://acme.atlassian.net
        ");
    }

    #[tokio::test]
    async fn unauthorized_points_at_configure() {
        let client = client(StubTransport::default().route(
            Method::Get,
            "/rest/api/3/myself",
            401,
            "",
        ));

        let err = run(&mut Vec::new(), &client).await.unwrap_err();
        assert!(err.to_string().contains("jt configure"));
    }
}
