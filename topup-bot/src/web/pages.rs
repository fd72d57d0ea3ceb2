//! Static HTML pages.

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
    <head>
        <title>遊戲自動化儲值 Line Bot</title>
        <meta charset="utf-8">
    </head>
    <body>
        <h1>🎮 遊戲自動化儲值 Line Bot</h1>
        <p>系統正在運行中！</p>
        <ul>
            <li>✅ Line Bot API 已連接</li>
            <li>✅ Webhook 已準備就緒</li>
            <li>✅ 自動化服務已啟動</li>
        </ul>
        <p><a href="/docs">查看 API 文檔</a></p>
    </body>
</html>
"#;

pub const PAYMENT_RETURN_HTML: &str = r#"<!DOCTYPE html>
<html>
    <head>
        <title>支付完成</title>
        <meta charset="utf-8">
    </head>
    <body>
        <h1>💳 支付處理中</h1>
        <p>您的支付正在處理中，請稍候...</p>
        <p>處理完成後會透過 Line Bot 通知您。</p>
        <script>
            setTimeout(function() {
                window.close();
            }, 3000);
        </script>
    </body>
</html>
"#;

pub const SWAGGER_UI_HTML: &str = r##"<!DOCTYPE html>
<html>
    <head>
        <title>遊戲自動化儲值 Line Bot - Swagger UI</title>
        <meta charset="utf-8">
        <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui.css">
    </head>
    <body>
        <div id="swagger-ui"></div>
        <script src="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
        <script>
            SwaggerUIBundle({ url: "/openapi.json", dom_id: "#swagger-ui" });
        </script>
    </body>
</html>
"##;

pub const REDOC_HTML: &str = r#"<!DOCTYPE html>
<html>
    <head>
        <title>遊戲自動化儲值 Line Bot - ReDoc</title>
        <meta charset="utf-8">
    </head>
    <body>
        <redoc spec-url="/openapi.json"></redoc>
        <script src="https://cdn.jsdelivr.net/npm/redoc@2/bundles/redoc.standalone.js"></script>
    </body>
</html>
"#;
