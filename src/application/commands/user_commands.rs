//! User Commands - 当前用户资料

/// 修改个人资料
#[derive(Debug, Clone)]
pub struct UpdateMe {
    pub user_id: i64,
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub image: Option<Option<String>>,
}

/// 修改密码，需提供当前密码
#[derive(Debug, Clone)]
pub struct ChangePassword {
    pub user_id: i64,
    pub password: String,
    pub new_password: String,
}
