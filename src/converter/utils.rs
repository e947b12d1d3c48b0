/// 将相邻且键相同的元素归为一组。
///
/// 与普通的分组不同，键相同但不相邻的元素会落在不同的组里：
/// `[1, 1, 2, 2, 1]` 分为 `[1, 1]`、`[2, 2]`、`[1]`。
pub fn group_by_continuous<T, K, F>(
    items: impl IntoIterator<Item = T>,
    mut key_of: F,
) -> Vec<(K, Vec<T>)>
where
    K: PartialEq,
    F: FnMut(&T) -> K,
{
    let mut groups: Vec<(K, Vec<T>)> = Vec::new();

    for item in items {
        let key = key_of(&item);
        match groups.last_mut() {
            Some((last_key, members)) if *last_key == key => members.push(item),
            _ => groups.push((key, vec![item])),
        }
    }

    groups
}

/// 按 `\r\n`、`\r`、`\n` 拆分文本。
pub fn split_lines(content: &str) -> impl Iterator<Item = &str> {
    content
        .split("\r\n")
        .flat_map(|line| line.split(['\r', '\n']))
}
