//! Static port → service-name table, used only for display.

/// IANA-style service name for a TCP `port`, if it is a well-known one.
pub fn service_name(port: u16) -> Option<&'static str> {
    let name = match port {
        20 => "ftp-data",
        21 => "ftp",
        22 => "ssh",
        23 => "telnet",
        25 => "smtp",
        53 => "domain",
        67 => "bootps",
        68 => "bootpc",
        69 => "tftp",
        80 => "http",
        88 => "kerberos",
        110 => "pop3",
        111 => "sunrpc",
        119 => "nntp",
        123 => "ntp",
        135 => "epmap",
        137 => "netbios-ns",
        138 => "netbios-dgm",
        139 => "netbios-ssn",
        143 => "imap2",
        161 => "snmp",
        162 => "snmp-trap",
        179 => "bgp",
        389 => "ldap",
        443 => "https",
        445 => "microsoft-ds",
        465 => "submissions",
        514 => "shell",
        515 => "printer",
        587 => "submission",
        631 => "ipp",
        636 => "ldaps",
        873 => "rsync",
        993 => "imaps",
        995 => "pop3s",
        1080 => "socks",
        1433 => "ms-sql-s",
        1521 => "oracle",
        1723 => "pptp",
        1883 => "mqtt",
        2049 => "nfs",
        2181 => "zookeeper",
        2375 => "docker",
        2376 => "docker-s",
        3000 => "http-dev",
        3128 => "squid",
        3306 => "mysql",
        3389 => "ms-wbt-server",
        4444 => "krb524",
        5000 => "upnp",
        5060 => "sip",
        5432 => "postgresql",
        5672 => "amqp",
        5900 => "vnc",
        5984 => "couchdb",
        6379 => "redis",
        6443 => "kube-apiserver",
        7001 => "afs3-callback",
        7002 => "afs3-prserver",
        8000 => "http-alt",
        8001 => "vcom-tunnel",
        8008 => "http-alt",
        8080 => "http-alt",
        8081 => "tproxy",
        8088 => "omniorb",
        8443 => "https-alt",
        8888 => "http-proxy",
        9000 => "cslistener",
        9092 => "kafka",
        9200 => "elasticsearch",
        9300 => "elasticsearch-transport",
        11211 => "memcache",
        27017 => "mongodb",
        _ => return None,
    };
    Some(name)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
