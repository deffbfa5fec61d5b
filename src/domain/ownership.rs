//! 所有权校验
//!
//! 文章、评论、商品的修改与删除只允许所有者执行

use thiserror::Error;

/// 有所有者的资源
pub trait Owned {
    /// 资源名称（用于错误信息，如 "article"）
    const RESOURCE: &'static str;

    fn owner_id(&self) -> i64;
}

/// 非所有者操作
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Should be the owner of the {resource}")]
pub struct NotOwner {
    pub resource: &'static str,
}

/// 校验 `actor_id` 是否为资源所有者
pub fn ensure_owner<T: Owned>(resource: &T, actor_id: i64) -> Result<(), NotOwner> {
    if resource.owner_id() == actor_id {
        Ok(())
    } else {
        Err(NotOwner {
            resource: T::RESOURCE,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Post {
        user_id: i64,
    }

    impl Owned for Post {
        const RESOURCE: &'static str = "post";

        fn owner_id(&self) -> i64 {
            self.user_id
        }
    }

    #[test]
    fn test_owner_passes() {
        assert!(ensure_owner(&Post { user_id: 1 }, 1).is_ok());
    }

    #[test]
    fn test_non_owner_rejected_with_resource_name() {
        let err = ensure_owner(&Post { user_id: 1 }, 2).unwrap_err();
        assert_eq!(err.to_string(), "Should be the owner of the post");
    }
}
